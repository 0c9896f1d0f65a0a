use super::timing::TimingBreakdown;
use crate::types::Ellipse;
use serde::Serialize;

/// Counters describing how much work one call did.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionStats {
    /// Arcs per quadrant class, classes 1 to 4.
    pub arcs_per_class: [usize; 4],
    /// Distinct arc pairs whose geometry was computed.
    pub pairs_computed: usize,
    pub cache_hits: usize,
    /// Triplets that reached the parameter estimator.
    pub triplets: usize,
    /// Candidates accepted by the validator, before clustering.
    pub candidates: usize,
    pub ellipses: usize,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    /// Edges came from the caller instead of the internal Canny stage.
    pub precomputed_edges: bool,
}

/// Result of [`EllipseDetector::detect_with_diagnostics`](crate::EllipseDetector).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub input: InputDescriptor,
    pub ellipses: Vec<Ellipse>,
    pub timings: TimingBreakdown,
    pub stats: DetectionStats,
}
