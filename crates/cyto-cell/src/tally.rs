//! Event counters for discrete rule firings.
//!
//! Death, division, type change, admission, and birth-death drift are easy
//! to lose inside a stochastic run.  Each tracked rule registers a named
//! counter when the tissue is assembled and bumps it every time it fires,
//! so output rows can report cumulative event totals alongside population
//! sizes.

use cyto_core::TallyId;

/// A registry of named event counters.
///
/// Registration is append-only and never deduplicates: two rules registered
/// under the same label get distinct counters, which keeps per-rule firing
/// counts separate even when the labels read the same.
#[derive(Clone, Debug, Default)]
pub struct ActionTally {
    names:  Vec<String>,
    counts: Vec<u64>,
}

impl ActionTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a counter and return its handle.
    pub fn register(&mut self, name: impl Into<String>) -> TallyId {
        let id = TallyId(self.names.len() as u16);
        self.names.push(name.into());
        self.counts.push(0);
        id
    }

    /// Record one firing. The `INVALID` sentinel is accepted and ignored,
    /// so rules built without a counter cost nothing to run.
    #[inline]
    pub fn bump(&mut self, id: TallyId) {
        if id != TallyId::INVALID {
            self.counts[id.index()] += 1;
        }
    }

    /// Cumulative firings of one counter.
    #[inline]
    pub fn count(&self, id: TallyId) -> u64 {
        self.counts[id.index()]
    }

    /// Number of registered counters.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All counters in registration order, as `(label, total)` rows.
    pub fn rows(&self) -> impl Iterator<Item = (&str, u64)> {
        self.names.iter().map(String::as_str).zip(self.counts.iter().copied())
    }
}
