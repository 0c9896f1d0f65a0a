//! Parameter types configuring the detector stages.
//!
//! Defaults are the published YAED settings. The onboard build on 640×360
//! frames runs looser acceptance gates, see [`DetectorParams::onboard`]. The
//! knobs most worth touching are `min_edge_length` (noise vs. small markers)
//! and the two acceptance gates `min_score` / `min_reliability`.

use crate::arcs::ArcFilter;
use crate::cluster::ClusterParams;
use crate::edges::CannyParams;
use crate::preprocess::GaussianKernel;
use crate::validate::ValidationParams;
use serde::{Deserialize, Serialize};

/// Detector-wide parameters controlling the whole pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    /// Gaussian kernel size (odd, >= 1).
    pub gauss_kernel_size: usize,
    /// Gaussian sigma; `<= 0` derives it from the kernel size.
    pub gauss_sigma: f64,
    /// Minimum number of pixels of an edge component.
    pub min_edge_length: usize,
    /// Minimum short side of a component's oriented bounding box.
    pub min_oriented_rect_side: f32,
    /// Maximum long/short ratio of a component's oriented bounding box.
    pub max_rect_axes_ratio: f32,
    /// Slack in pixels for the end-point position checks between arcs.
    pub position_threshold: f32,
    /// Maximum distance between the two pair centers of a triplet, as a
    /// fraction of the image diagonal.
    pub max_center_distance: f32,
    /// Contour tolerance of the normalised residual used by the score.
    pub distance_to_contour: f32,
    pub min_score: f32,
    pub min_reliability: f32,
    /// Number of chords sampled per arc pair.
    pub ns: usize,
    pub canny: CannyParams,
    pub cluster: ClusterParams,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            gauss_kernel_size: 5,
            gauss_sigma: 1.0,
            min_edge_length: 16,
            min_oriented_rect_side: 3.0,
            max_rect_axes_ratio: 10.0,
            position_threshold: 1.0,
            max_center_distance: 0.05,
            distance_to_contour: 0.1,
            min_score: 0.72,
            min_reliability: 0.5,
            ns: 16,
            canny: CannyParams::default(),
            cluster: ClusterParams::default(),
        }
    }
}

/// A parameter outside its valid domain.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamsError {
    KernelSize(usize),
    TooFewSamples(usize),
    /// A field that must be finite and within `[min, max]`.
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl std::fmt::Display for ParamsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamsError::KernelSize(k) => {
                write!(f, "gauss_kernel_size must be odd and positive (got {k})")
            }
            ParamsError::TooFewSamples(ns) => write!(f, "ns must be at least 2 (got {ns})"),
            ParamsError::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{field}={value} outside [{min}, {max}]"),
        }
    }
}

impl std::error::Error for ParamsError {}

fn check(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ParamsError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ParamsError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

impl DetectorParams {
    /// Settings of the onboard marker search: default geometry with both
    /// acceptance gates lowered to 0.4.
    pub fn onboard() -> Self {
        Self {
            min_score: 0.4,
            min_reliability: 0.4,
            ..Self::default()
        }
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.gauss_kernel_size == 0 || self.gauss_kernel_size % 2 == 0 {
            return Err(ParamsError::KernelSize(self.gauss_kernel_size));
        }
        if self.ns < 2 {
            return Err(ParamsError::TooFewSamples(self.ns));
        }
        let inf = f64::MAX;
        check("gauss_sigma", self.gauss_sigma, f64::MIN, inf)?;
        check("min_oriented_rect_side", self.min_oriented_rect_side as f64, 0.0, inf)?;
        check("max_rect_axes_ratio", self.max_rect_axes_ratio as f64, 1.0, inf)?;
        check("position_threshold", self.position_threshold as f64, 0.0, inf)?;
        check("max_center_distance", self.max_center_distance as f64, 0.0, inf)?;
        check("distance_to_contour", self.distance_to_contour as f64, 0.0, inf)?;
        check("min_score", self.min_score as f64, 0.0, 1.0)?;
        check("min_reliability", self.min_reliability as f64, 0.0, 1.0)?;
        check("canny.percent_not_edges", self.canny.percent_not_edges as f64, 0.0, 1.0)?;
        check("canny.threshold_ratio", self.canny.threshold_ratio as f64, 0.0, 1.0)?;
        check("cluster.center_ratio", self.cluster.center_ratio as f64, 0.0, inf)?;
        check("cluster.axis_ratio", self.cluster.axis_ratio as f64, 0.0, inf)?;
        check("cluster.angle_ratio", self.cluster.angle_ratio as f64, 0.0, inf)?;
        check("cluster.circle_ratio", self.cluster.circle_ratio as f64, 0.0, 1.0)?;
        Ok(())
    }

    /// Smoothing kernel described by `gauss_kernel_size` and `gauss_sigma`.
    pub fn kernel(&self) -> GaussianKernel {
        GaussianKernel::new(self.gauss_kernel_size, self.gauss_sigma)
    }

    pub(crate) fn arc_filter(&self) -> ArcFilter {
        ArcFilter {
            min_edge_length: self.min_edge_length,
            min_oriented_rect_side: self.min_oriented_rect_side,
            max_rect_axes_ratio: self.max_rect_axes_ratio,
        }
    }

    pub(crate) fn validation(&self) -> ValidationParams {
        ValidationParams {
            distance_to_contour: self.distance_to_contour,
            min_score: self.min_score,
            min_reliability: self.min_reliability,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(DetectorParams::default().validate(), Ok(()));
    }

    #[test]
    fn onboard_preset_only_relaxes_the_acceptance_gates() {
        let defaults = DetectorParams::default();
        assert_eq!((defaults.min_score, defaults.min_reliability), (0.72, 0.5));

        let onboard = DetectorParams::onboard();
        assert_eq!(onboard.validate(), Ok(()));
        assert_eq!((onboard.min_score, onboard.min_reliability), (0.4, 0.4));
        assert_eq!(
            DetectorParams {
                min_score: defaults.min_score,
                min_reliability: defaults.min_reliability,
                ..onboard
            },
            defaults
        );
    }

    #[test]
    fn even_kernel_and_bad_ratios_are_rejected() {
        let params = DetectorParams {
            gauss_kernel_size: 4,
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(ParamsError::KernelSize(4)));

        let params = DetectorParams {
            min_score: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ParamsError::OutOfRange { field: "min_score", .. })
        ));

        let params = DetectorParams {
            distance_to_contour: f32::NAN,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = DetectorParams {
            ns: 1,
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(ParamsError::TooFewSamples(1)));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let params: DetectorParams =
            serde_json::from_str(r#"{ "min_score": 0.8, "cluster": { "axis_ratio": 0.2 } }"#)
                .expect("parse");
        assert_eq!(params.min_score, 0.8);
        assert_eq!(params.cluster.axis_ratio, 0.2);
        assert_eq!(params.cluster.circle_ratio, 0.9);
        assert_eq!(params.ns, 16);
    }
}
