use ellipse_detector::config::detect::{self, DetectToolConfig};
use ellipse_detector::diagnostics::DetectionReport;
use ellipse_detector::image::io::{load_grayscale_image, save_edge_map, write_json_file};
use ellipse_detector::image::EdgeMap;
use ellipse_detector::preprocess::preprocess;
use ellipse_detector::{DetectorParams, EllipseDetector, ParamsError};
use rayon::prelude::*;
use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageOutcome {
    input: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<DetectionReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchReport {
    params: DetectorParams,
    wall_ms: f64,
    images: Vec<ImageOutcome>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = detect::load_config(Path::new(&config_path))?;
    config
        .params
        .validate()
        .map_err(|e| format!("Invalid detector params: {e}"))?;

    let pool = {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(threads) = config.threads {
            builder = builder.num_threads(threads);
        }
        builder
            .build()
            .map_err(|e| format!("Failed to build thread pool: {e}"))?
    };

    let start = Instant::now();
    let images = pool.install(|| process_all(&config));
    let wall_ms = start.elapsed().as_secs_f64() * 1000.0;

    let found: usize = images
        .iter()
        .filter_map(|o| o.report.as_ref())
        .map(|r| r.ellipses.len())
        .sum();
    let failed = images.iter().filter(|o| o.error.is_some()).count();
    println!(
        "Processed {} image(s) in {:.1} ms: {} ellipse(s), {} failure(s)",
        images.len(),
        wall_ms,
        found,
        failed
    );
    for outcome in &images {
        match (&outcome.report, &outcome.error) {
            (Some(report), _) => println!(
                "  {}: {} ellipse(s) in {:.2} ms",
                outcome.input.display(),
                report.ellipses.len(),
                report.timings.total_ms
            ),
            (None, Some(err)) => println!("  {}: {err}", outcome.input.display()),
            (None, None) => {}
        }
    }

    let batch = BatchReport {
        params: config.params.clone(),
        wall_ms,
        images,
    };
    write_json_file(&config.output.report_json, &batch)?;
    println!("Report written to {}", config.output.report_json.display());
    Ok(())
}

/// One detector per rayon worker; inputs are processed in parallel and
/// returned in input order.
fn process_all(config: &DetectToolConfig) -> Vec<ImageOutcome> {
    config
        .inputs
        .par_iter()
        .map_init(
            || EllipseDetector::with_params(config.params.clone()),
            |detector, input| {
                let result = process_one(detector, input, config);
                match result {
                    Ok(report) => ImageOutcome {
                        input: input.clone(),
                        report: Some(report),
                        error: None,
                    },
                    Err(err) => ImageOutcome {
                        input: input.clone(),
                        report: None,
                        error: Some(err),
                    },
                }
            },
        )
        .collect()
}

fn process_one(
    detector: &mut Result<EllipseDetector, ParamsError>,
    input: &Path,
    config: &DetectToolConfig,
) -> Result<DetectionReport, String> {
    let detector = detector.as_mut().map_err(|e| e.to_string())?;
    let gray = load_grayscale_image(input)?;
    let report = detector
        .detect_with_diagnostics(gray.as_view())
        .map_err(|e| format!("Detection failed: {e}"))?;

    if let Some(dir) = &config.output.edges_dir {
        let split = preprocess(&gray.as_view(), &config.params.kernel(), &config.params.canny);
        let mut merged = EdgeMap::new(split.positive.w, split.positive.h);
        for (dst, (&p, &n)) in merged
            .data
            .iter_mut()
            .zip(split.positive.data.iter().zip(&split.negative.data))
        {
            *dst = p.max(n);
        }
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        save_edge_map(&merged, &dir.join(format!("{stem}_edges.png")))?;
    }
    Ok(report)
}

fn usage() -> String {
    "Usage: detect_ellipses <config.json>".to_string()
}
