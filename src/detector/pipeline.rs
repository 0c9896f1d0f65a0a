//! Detector pipeline driving ellipse detection end-to-end.
//!
//! [`EllipseDetector`] takes one grayscale frame per call and returns the
//! validated, de-duplicated ellipses. Stages run strictly in order:
//! preprocessing, arc extraction, triplet grouping with per-triplet
//! estimation (voting, then a least-squares refit) and validation, then
//! clustering.
//!
//! Typical usage:
//! ```no_run
//! use ellipse_detector::{DetectorParams, EllipseDetector};
//! use ellipse_detector::image::ImageU8;
//!
//! # fn example(gray: ImageU8) -> Result<(), Box<dyn std::error::Error>> {
//! let mut detector = EllipseDetector::with_params(DetectorParams::default())?;
//! let report = detector.detect_with_diagnostics(gray)?;
//! for e in &report.ellipses {
//!     println!("({:.1}, {:.1}) score={:.2}", e.cx, e.cy, e.score);
//! }
//! # Ok(())
//! # }
//! ```
use super::error::DetectError;
use super::params::{DetectorParams, ParamsError};
use super::workspace::DetectorWorkspace;
use crate::arcs::extract_arcs;
use crate::cluster::cluster_ellipses;
use crate::diagnostics::timing::{
    elapsed_ms, STAGE_ARC_EXTRACTION, STAGE_CLUSTERING, STAGE_EDGE_DETECTION, STAGE_ESTIMATION,
    STAGE_GROUPING, STAGE_VALIDATION,
};
use crate::diagnostics::{DetectionReport, DetectionStats, InputDescriptor, TimingBreakdown};
use crate::fit::{estimate_ellipse, for_each_triplet, refine_ellipse, GroupingParams};
use crate::image::{EdgeMap, ImageF32, ImageU8, ImageView};
use crate::preprocess::{preprocess, split_by_orientation, EdgeSplit};
use crate::types::Ellipse;
use crate::validate::validate;
use log::debug;
use std::time::Instant;

/// Ellipse detector holding its configuration and reusable buffers.
///
/// One instance serves one caller at a time; give each worker thread its own.
#[derive(Debug, Default)]
pub struct EllipseDetector {
    params: Option<DetectorParams>,
    workspace: DetectorWorkspace,
    last_timings: TimingBreakdown,
    last_stats: DetectionStats,
}

impl EllipseDetector {
    /// Create an unconfigured detector. [`configure`](Self::configure) must be
    /// called before the first detection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detector configured with `params`.
    pub fn with_params(params: DetectorParams) -> Result<Self, ParamsError> {
        let mut detector = Self::new();
        detector.configure(params)?;
        Ok(detector)
    }

    /// Replace the parameters; takes effect on the next call.
    pub fn configure(&mut self, params: DetectorParams) -> Result<(), ParamsError> {
        params.validate()?;
        self.params = Some(params);
        Ok(())
    }

    pub fn params(&self) -> Option<&DetectorParams> {
        self.params.as_ref()
    }

    /// Detect ellipses in an 8-bit grayscale frame.
    pub fn detect(&mut self, gray: ImageU8<'_>) -> Result<Vec<Ellipse>, DetectError> {
        self.detect_with_diagnostics(gray).map(|report| report.ellipses)
    }

    /// Detect ellipses and return timings and counters alongside them.
    pub fn detect_with_diagnostics(
        &mut self,
        gray: ImageU8<'_>,
    ) -> Result<DetectionReport, DetectError> {
        let params = self.params.clone().ok_or(DetectError::NotConfigured)?;
        let (width, height) = (gray.width(), gray.height());
        if gray.is_empty() || !gray.is_consistent() {
            return Err(DetectError::InvalidInput { width, height });
        }
        debug!("EllipseDetector::detect start w={} h={}", width, height);
        let total_start = Instant::now();

        let edge_start = Instant::now();
        let split = preprocess(&gray, &params.kernel(), &params.canny);
        let edge_ms = elapsed_ms(edge_start);

        let input = InputDescriptor {
            width,
            height,
            precomputed_edges: false,
        };
        Ok(self.finish(&params, input, split, edge_ms, total_start))
    }

    /// Detect ellipses from a caller-supplied binary edge map and gradient
    /// orientation map (radians), bypassing blur and Canny.
    pub fn detect_precomputed(
        &mut self,
        edges: &EdgeMap,
        orientation: &ImageF32,
    ) -> Result<Vec<Ellipse>, DetectError> {
        self.detect_precomputed_with_diagnostics(edges, orientation)
            .map(|report| report.ellipses)
    }

    pub fn detect_precomputed_with_diagnostics(
        &mut self,
        edges: &EdgeMap,
        orientation: &ImageF32,
    ) -> Result<DetectionReport, DetectError> {
        let params = self.params.clone().ok_or(DetectError::NotConfigured)?;
        if (edges.w, edges.h) != (orientation.w, orientation.h) {
            return Err(DetectError::DimensionMismatch {
                edges: (edges.w, edges.h),
                orientation: (orientation.w, orientation.h),
            });
        }
        let pixels = edges.w * edges.h;
        if edges.is_empty() || edges.data.len() != pixels || orientation.data.len() != pixels {
            return Err(DetectError::InvalidInput {
                width: edges.w,
                height: edges.h,
            });
        }
        debug!(
            "EllipseDetector::detect_precomputed start w={} h={}",
            edges.w, edges.h
        );
        let total_start = Instant::now();
        let edge_start = Instant::now();
        let split = split_by_orientation(edges, orientation);
        let edge_ms = elapsed_ms(edge_start);
        let input = InputDescriptor {
            width: edges.w,
            height: edges.h,
            precomputed_edges: true,
        };
        Ok(self.finish(&params, input, split, edge_ms, total_start))
    }

    /// Timings of the most recent successful call.
    pub fn last_timings(&self) -> &TimingBreakdown {
        &self.last_timings
    }

    pub fn last_stats(&self) -> &DetectionStats {
        &self.last_stats
    }

    /// Total wall time of the most recent successful call, in milliseconds.
    pub fn exec_time_ms(&self) -> f64 {
        self.last_timings.total_ms
    }

    fn finish(
        &mut self,
        params: &DetectorParams,
        input: InputDescriptor,
        split: EdgeSplit,
        edge_ms: f64,
        total_start: Instant,
    ) -> DetectionReport {
        let (width, height) = (input.width, input.height);
        let diagonal = split.positive.diagonal();
        let a_bins = width.max(height);
        let mut stats = DetectionStats::default();

        let arc_start = Instant::now();
        let arcs = extract_arcs(&split, &params.arc_filter());
        let arc_ms = elapsed_ms(arc_start);
        stats.arcs_per_class = arcs.counts();
        debug!(
            "EllipseDetector::detect arcs per class={:?}",
            stats.arcs_per_class
        );

        let grouping = GroupingParams {
            position_threshold: params.position_threshold,
            max_center_distance: params.max_center_distance * diagonal,
            ns: params.ns,
        };
        let validation = params.validation();
        let workspace = &mut self.workspace;
        workspace.reset();
        let accumulators = &mut workspace.accumulators;
        let mut candidates: Vec<Ellipse> = Vec::new();
        let mut estimation_ms = 0.0;
        let mut validation_ms = 0.0;

        let group_start = Instant::now();
        stats.triplets = for_each_triplet(&arcs, &mut workspace.cache, &grouping, |triplet| {
            let est_start = Instant::now();
            let voted = estimate_ellipse(accumulators, triplet.arcs, triplet.ij, triplet.ik, a_bins);
            let candidate = refine_ellipse(&voted, triplet.arcs);
            estimation_ms += elapsed_ms(est_start);

            let val_start = Instant::now();
            if let Some(accepted) = validate(&candidate, triplet.arcs, &validation) {
                candidates.push(accepted);
            }
            validation_ms += elapsed_ms(val_start);
        });
        let grouping_ms = (elapsed_ms(group_start) - estimation_ms - validation_ms).max(0.0);
        stats.pairs_computed = workspace.cache.computations();
        stats.cache_hits = workspace.cache.hits();
        stats.candidates = candidates.len();
        debug!(
            "EllipseDetector::detect pairs={} hits={} triplets={} candidates={}",
            stats.pairs_computed, stats.cache_hits, stats.triplets, stats.candidates
        );

        let cluster_start = Instant::now();
        let ellipses = cluster_ellipses(candidates, &params.cluster);
        let cluster_ms = elapsed_ms(cluster_start);
        stats.ellipses = ellipses.len();

        let mut timings = TimingBreakdown::with_total(elapsed_ms(total_start));
        timings.push(STAGE_EDGE_DETECTION, edge_ms);
        timings.push(STAGE_ARC_EXTRACTION, arc_ms);
        timings.push(STAGE_GROUPING, grouping_ms);
        timings.push(STAGE_ESTIMATION, estimation_ms);
        timings.push(STAGE_VALIDATION, validation_ms);
        timings.push(STAGE_CLUSTERING, cluster_ms);
        debug!(
            "EllipseDetector::detect done ellipses={} total_ms={:.3}",
            stats.ellipses, timings.total_ms
        );

        self.last_timings = timings.clone();
        self.last_stats = stats.clone();
        DetectionReport {
            input,
            ellipses,
            timings,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_detector_refuses_to_run() {
        let mut det = EllipseDetector::new();
        let buf = vec![0u8; 16];
        let err = det.detect(ImageU8::new(4, 4, &buf)).unwrap_err();
        assert_eq!(err, DetectError::NotConfigured);
    }

    #[test]
    fn empty_raster_is_invalid_input() {
        let mut det = EllipseDetector::with_params(DetectorParams::default()).unwrap();
        let err = det.detect(ImageU8::new(0, 10, &[])).unwrap_err();
        assert_eq!(
            err,
            DetectError::InvalidInput {
                width: 0,
                height: 10
            }
        );
    }

    #[test]
    fn mismatched_precomputed_maps_are_rejected() {
        let mut det = EllipseDetector::with_params(DetectorParams::default()).unwrap();
        let edges = EdgeMap::new(10, 10);
        let orientation = ImageF32::new(10, 12);
        assert!(matches!(
            det.detect_precomputed(&edges, &orientation),
            Err(DetectError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn short_orientation_buffer_is_invalid_input() {
        let mut det = EllipseDetector::with_params(DetectorParams::default()).unwrap();
        let edges = EdgeMap::new(10, 10);
        let orientation = ImageF32 {
            w: 10,
            h: 10,
            data: vec![0.0; 50],
        };
        assert_eq!(
            det.detect_precomputed(&edges, &orientation).unwrap_err(),
            DetectError::InvalidInput {
                width: 10,
                height: 10
            }
        );
    }

    #[test]
    fn reconfigured_params_apply_to_the_next_call() {
        let (w, h) = (96usize, 96usize);
        let mut edges = EdgeMap::new(w, h);
        let mut orientation = ImageF32::new(w, h);
        for k in 0..360 {
            let t = (k as f32).to_radians();
            let x = (48.0 + 30.0 * t.cos()).round() as usize;
            let y = (48.0 + 30.0 * t.sin()).round() as usize;
            edges.mark(x, y);
            orientation.set(x, y, t);
        }
        let mut det = EllipseDetector::with_params(DetectorParams::default()).unwrap();
        let before = det.detect_precomputed_with_diagnostics(&edges, &orientation).unwrap();
        assert!(before.stats.arcs_per_class.iter().sum::<usize>() > 0);

        det.configure(DetectorParams {
            min_edge_length: 1000,
            ..Default::default()
        })
        .unwrap();
        let after = det.detect_precomputed_with_diagnostics(&edges, &orientation).unwrap();
        assert_eq!(after.stats.arcs_per_class, [0; 4]);
        assert!(after.ellipses.is_empty());
    }

    #[test]
    fn invalid_params_are_refused_and_previous_kept() {
        let mut det = EllipseDetector::with_params(DetectorParams::default()).unwrap();
        let bad = DetectorParams {
            gauss_kernel_size: 2,
            ..Default::default()
        };
        assert!(det.configure(bad).is_err());
        assert_eq!(det.params(), Some(&DetectorParams::default()));
    }

    #[test]
    fn blank_frame_reports_all_stages() {
        let mut det = EllipseDetector::with_params(DetectorParams::default()).unwrap();
        let buf = vec![128u8; 64 * 48];
        let report = det.detect_with_diagnostics(ImageU8::new(64, 48, &buf)).unwrap();
        assert!(report.ellipses.is_empty());
        assert_eq!(report.timings.stages.len(), 6);
        assert!(report.timings.stage_ms(STAGE_CLUSTERING).is_some());
        assert_eq!(report.stats.arcs_per_class, [0; 4]);
        assert_eq!(det.exec_time_ms(), report.timings.total_ms);
    }
}
