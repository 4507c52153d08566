//! Dense three-dimensional array storage.
//!
//! `Grid3<T>` backs both the field engine's concentration lattices and the
//! population manager's per-patch agent lists.  Layout is row-major
//! `i·(ny·nz) + j·nz + k`, so inner walks over `k` touch contiguous memory.

/// A dense 3D array with debug-checked triple indexing.
#[derive(Debug)]
pub struct Grid3<T> {
    nx:   usize,
    ny:   usize,
    nz:   usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid3<T> {
    /// Allocate an `nx × ny × nz` grid of default values.
    ///
    /// # Panics
    ///
    /// Panics if any dimension is zero.
    pub fn new(nx: usize, ny: usize, nz: usize) -> Self {
        assert!(nx > 0 && ny > 0 && nz > 0, "grid dimensions must be nonzero");
        Self {
            nx,
            ny,
            nz,
            data: vec![T::default(); nx * ny * nz],
        }
    }
}

impl<T> Grid3<T> {
    #[inline]
    pub fn xsize(&self) -> usize {
        self.nx
    }

    #[inline]
    pub fn ysize(&self) -> usize {
        self.ny
    }

    #[inline]
    pub fn zsize(&self) -> usize {
        self.nz
    }

    /// Total number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    fn flat(&self, i: usize, j: usize, k: usize) -> usize {
        debug_assert!(
            i < self.nx && j < self.ny && k < self.nz,
            "grid index ({i}, {j}, {k}) out of bounds ({}, {}, {})",
            self.nx,
            self.ny,
            self.nz
        );
        i * (self.ny * self.nz) + j * self.nz + k
    }

    #[inline]
    pub fn at(&self, i: usize, j: usize, k: usize) -> &T {
        &self.data[self.flat(i, j, k)]
    }

    #[inline]
    pub fn at_mut(&mut self, i: usize, j: usize, k: usize) -> &mut T {
        let idx = self.flat(i, j, k);
        &mut self.data[idx]
    }

    /// Flat view of the storage, `k` fastest.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Flat mutable view of the storage, `k` fastest.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T: Clone> Grid3<T> {
    /// Overwrite every entry with `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl Grid3<f64> {
    /// Trilinear interpolation at fractional indices.
    ///
    /// `(fix, fiy, fiz)` locate a point in index space; the eight stored
    /// values surrounding it are blended by their distance weights.  The
    /// floor corner and its `+1` neighbors must all be valid indices.
    pub fn interpolate(&self, fix: f64, fiy: f64, fiz: f64) -> f64 {
        debug_assert!(fix >= 0.0 && fiy >= 0.0 && fiz >= 0.0);

        // Indices of the lower-bound stored value.
        let xi = fix as usize;
        let yi = fiy as usize;
        let zi = fiz as usize;

        // Interpolation parameters in each dimension.
        let fx = fix - xi as f64;
        let fy = fiy - yi as f64;
        let fz = fiz - zi as f64;

        let mut value = (1.0 - fx) * (1.0 - fy) * (1.0 - fz) * self.at(xi, yi, zi);
        value += fx * (1.0 - fy) * (1.0 - fz) * self.at(xi + 1, yi, zi);
        value += fx * fy * (1.0 - fz) * self.at(xi + 1, yi + 1, zi);
        value += (1.0 - fx) * fy * (1.0 - fz) * self.at(xi, yi + 1, zi);
        value += (1.0 - fx) * (1.0 - fy) * fz * self.at(xi, yi, zi + 1);
        value += fx * (1.0 - fy) * fz * self.at(xi + 1, yi, zi + 1);
        value += fx * fy * fz * self.at(xi + 1, yi + 1, zi + 1);
        value += (1.0 - fx) * fy * fz * self.at(xi, yi + 1, zi + 1);

        value
    }
}
