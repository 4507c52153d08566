//! Aggregate time series sampled from a running tissue.

use cyto_core::{AttrId, MolId, TypeId};
use cyto_sim::Tissue;

use crate::row::SampleRow;
use crate::ReportResult;

/// One explicitly tracked `type:attribute` column.
struct TrackedPair {
    type_id: TypeId,
    attr:    AttrId,
    label:   String,
}

/// Aggregate model data for the duration of a run.
///
/// Each [`sample`][Self::sample] appends, for the current simulated time,
/// every cell type's live count, every field's average concentration, and
/// the population-wide attribute total of each tracked pair.  The peak
/// concentration over all fields and the peak count over all types are kept
/// as running maxima for scaling plots.
///
/// The schema (type names, molecule names, attribute widths) is fixed at
/// construction, so the tissue's registries must not change between
/// samples.
pub struct History {
    times: Vec<f64>,

    mol_names:      Vec<String>,
    conc_histories: Vec<Vec<f64>>,

    type_names:      Vec<String>,
    count_histories: Vec<Vec<u64>>,

    /// Per-type attribute totals for the latest sample only.
    totals: Vec<Vec<f64>>,

    pairs:          Vec<TrackedPair>,
    pair_histories: Vec<Vec<f64>>,

    max_conc:  f64,
    max_count: u64,
}

impl History {
    /// Capture the tissue's schema: one count series per registered type,
    /// one concentration series per field, no tracked pairs yet.
    pub fn new(tissue: &Tissue) -> Self {
        let mol_names: Vec<String> = tissue
            .fields()
            .iter()
            .map(|field| field.name().to_string())
            .collect();
        let types = tissue.population().types();
        let type_names: Vec<String> = types.iter().map(|ty| ty.name().to_string()).collect();
        let totals = types.iter().map(|ty| vec![0.0; ty.attribute_count()]).collect();
        History {
            times:           Vec::new(),
            conc_histories:  vec![Vec::new(); mol_names.len()],
            mol_names,
            count_histories: vec![Vec::new(); type_names.len()],
            type_names,
            totals,
            pairs:           Vec::new(),
            pair_histories:  Vec::new(),
            max_conc:        0.0,
            max_count:       0,
        }
    }

    /// Add a `type:attribute` column to the sampled series.
    ///
    /// # Errors
    ///
    /// Both names must resolve against the tissue's registries.
    ///
    /// # Panics
    ///
    /// Columns cannot be added once sampling has started, or the series
    /// would have ragged lengths.
    pub fn track(&mut self, tissue: &Tissue, type_name: &str, attr_name: &str) -> ReportResult<()> {
        assert!(self.times.is_empty(), "track attributes before the first sample");
        let type_id = tissue.population().type_id(type_name)?;
        let attr = tissue.population().cell_type(type_id).require_attribute(attr_name)?;
        self.pairs.push(TrackedPair {
            type_id,
            attr,
            label: format!("{type_name}:{attr_name}"),
        });
        self.pair_histories.push(Vec::new());
        Ok(())
    }

    /// Append one sample of the tissue's current aggregate state.
    pub fn sample(&mut self, tissue: &Tissue) {
        self.times.push(tissue.time());

        for (history, field) in self.conc_histories.iter_mut().zip(tissue.fields()) {
            let conc = field.avg_conc();
            history.push(conc);
            if conc > self.max_conc {
                self.max_conc = conc;
            }
        }

        // One pass over the live cells fills this sample's counts and
        // overwrites the running attribute totals.
        for totals in &mut self.totals {
            totals.fill(0.0);
        }
        let mut counts = vec![0_u64; self.type_names.len()];
        for cell in tissue.population().live_cells() {
            let index = cell.type_id().index();
            counts[index] += 1;
            for (slot, value) in self.totals[index].iter_mut().zip(cell.values()) {
                *slot += value;
            }
        }
        for (history, &count) in self.count_histories.iter_mut().zip(&counts) {
            history.push(count);
            if count > self.max_count {
                self.max_count = count;
            }
        }

        for (history, pair) in self.pair_histories.iter_mut().zip(&self.pairs) {
            history.push(self.totals[pair.type_id.index()][pair.attr.index()]);
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// Number of samples taken so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Simulated time of each sample.
    #[inline]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    #[inline]
    pub fn type_names(&self) -> &[String] {
        &self.type_names
    }

    #[inline]
    pub fn mol_names(&self) -> &[String] {
        &self.mol_names
    }

    /// Average-concentration series of one field.
    #[inline]
    pub fn conc_history(&self, mol: MolId) -> &[f64] {
        &self.conc_histories[mol.index()]
    }

    /// Latest sampled average concentration of one field.
    pub fn current_conc(&self, mol: MolId) -> Option<f64> {
        self.conc_histories[mol.index()].last().copied()
    }

    /// Peak average concentration seen over all fields and samples.
    #[inline]
    pub fn max_conc(&self) -> f64 {
        self.max_conc
    }

    /// Live-count series of one type.
    #[inline]
    pub fn count_history(&self, ty: TypeId) -> &[u64] {
        &self.count_histories[ty.index()]
    }

    /// Latest sampled live count of one type.
    pub fn current_count(&self, ty: TypeId) -> Option<u64> {
        self.count_histories[ty.index()].last().copied()
    }

    /// Peak live count seen over all types and samples.
    #[inline]
    pub fn max_count(&self) -> u64 {
        self.max_count
    }

    /// Latest per-attribute totals of one type, in declared attribute
    /// order.  All zeros before the first sample.
    #[inline]
    pub fn totals(&self, ty: TypeId) -> &[f64] {
        &self.totals[ty.index()]
    }

    /// Column labels in row order: time, type names, molecule names,
    /// tracked `type:attribute` labels.
    pub fn columns(&self) -> Vec<String> {
        let mut columns = Vec::with_capacity(
            1 + self.type_names.len() + self.mol_names.len() + self.pairs.len(),
        );
        columns.push("time".to_string());
        columns.extend(self.type_names.iter().cloned());
        columns.extend(self.mol_names.iter().cloned());
        columns.extend(self.pairs.iter().map(|pair| pair.label.clone()));
        columns
    }

    /// One sample flattened into [`columns`][Self::columns] order.
    ///
    /// # Panics
    ///
    /// `index` must be less than [`len`][Self::len].
    pub fn row(&self, index: usize) -> SampleRow {
        SampleRow {
            time:    self.times[index],
            counts:  self.count_histories.iter().map(|h| h[index]).collect(),
            concs:   self.conc_histories.iter().map(|h| h[index]).collect(),
            tracked: self.pair_histories.iter().map(|h| h[index]).collect(),
        }
    }
}
