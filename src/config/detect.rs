use crate::detector::DetectorParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration of the `detect_ellipses` batch tool.
#[derive(Debug, Deserialize)]
pub struct DetectToolConfig {
    /// Images to process.
    pub inputs: Vec<PathBuf>,
    #[serde(default)]
    pub params: DetectorParams,
    /// Worker threads; `None` lets rayon decide.
    #[serde(default)]
    pub threads: Option<usize>,
    pub output: DetectOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct DetectOutputConfig {
    /// JSON report with the ellipses, timings and counters of every input.
    pub report_json: PathBuf,
    /// Directory receiving one edge-map PNG per input, if set.
    #[serde(default)]
    pub edges_dir: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<DetectToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&data).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

fn parse_config(data: &str) -> Result<DetectToolConfig, serde_json::Error> {
    serde_json::from_str(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_default_params() {
        let cfg = parse_config(
            r#"{ "inputs": ["a.png", "b.png"], "output": { "report_json": "out/report.json" } }"#,
        )
        .expect("parse");
        assert_eq!(cfg.inputs.len(), 2);
        assert_eq!(cfg.params, DetectorParams::default());
        assert!(cfg.threads.is_none());
        assert!(cfg.output.edges_dir.is_none());
    }

    #[test]
    fn missing_output_section_is_an_error() {
        assert!(parse_config(r#"{ "inputs": [] }"#).is_err());
    }
}
