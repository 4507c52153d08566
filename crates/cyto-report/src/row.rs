//! Plain data row types written by report backends.

/// One history sample flattened into column order: time, per-type live
/// counts, per-field average concentrations, tracked attribute totals.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    pub time:    f64,
    pub counts:  Vec<u64>,
    pub concs:   Vec<f64>,
    pub tracked: Vec<f64>,
}

/// One action counter's final value.
#[derive(Debug, Clone, PartialEq)]
pub struct TallyRow {
    pub name:  String,
    pub count: u64,
}
