//! Bookkeeping for marker candidates handed to the downstream classifier.
//!
//! The detector only finds ellipses. Whether a marker carries a "T" or an
//! "F" is decided elsewhere; this module accumulates those verdicts per
//! candidate and ranks the candidates for the mission logic.
use crate::types::Ellipse;
use serde::Serialize;
use std::cmp::Ordering;

/// Classification verdict for one observation of a marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum MarkerLabel {
    #[default]
    Unrecognized,
    True,
    False,
}

/// A marker hypothesis accumulated over several classifier observations.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetCandidate {
    /// Center offset from the image center, x right.
    pub dx: f32,
    /// Center offset from the image center, y down.
    pub dy: f32,
    pub semi_major: f32,
    pub true_count: u32,
    pub false_count: u32,
    pub confidence: f32,
}

impl TargetCandidate {
    /// Candidate for `ellipse` seen in a `width × height` frame. Confidence
    /// starts at the detection score.
    pub fn from_ellipse(ellipse: &Ellipse, width: usize, height: usize) -> Self {
        Self {
            dx: ellipse.cx - width as f32 * 0.5,
            dy: ellipse.cy - height as f32 * 0.5,
            semi_major: ellipse.semi_major,
            true_count: 0,
            false_count: 0,
            confidence: ellipse.score,
        }
    }

    /// Count one classifier verdict.
    pub fn record(&mut self, label: MarkerLabel) {
        match label {
            MarkerLabel::True => self.true_count += 1,
            MarkerLabel::False => self.false_count += 1,
            MarkerLabel::Unrecognized => {}
        }
    }

    /// Number of conclusive verdicts.
    pub fn observations(&self) -> u32 {
        self.true_count + self.false_count
    }

    /// Majority verdict, `Unrecognized` on a tie.
    pub fn label(&self) -> MarkerLabel {
        match self.true_count.cmp(&self.false_count) {
            Ordering::Greater => MarkerLabel::True,
            Ordering::Less => MarkerLabel::False,
            Ordering::Equal => MarkerLabel::Unrecognized,
        }
    }

    /// Ranking order: higher confidence first, then more "T" verdicts.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .confidence
            .total_cmp(&self.confidence)
            .then_with(|| other.true_count.cmp(&self.true_count))
    }
}

/// Sort candidates best first. Fully tied candidates keep their order.
pub fn rank_targets(candidates: &mut [TargetCandidate]) {
    candidates.sort_by(TargetCandidate::rank_cmp);
}
