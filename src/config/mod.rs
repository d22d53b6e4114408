//! JSON configuration of the `panel_postprocess` tool.
//!
//! ```json
//! {
//!   "input": "tile.png",
//!   "mask": "tile_mask.png",
//!   "params": { "number_clusters": 3, "hough": { "min_angle": 10 } },
//!   "output": { "cropped_image": "out/cropped.png", "report_json": "out/report.json" }
//! }
//! ```
use crate::error::{PanelError, Result};
use crate::params::PostprocessParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
pub struct ToolConfig {
    /// RGB image to post-process.
    pub input: PathBuf,
    /// Grayscale confidence mask, scaled from 0–255 to [0,1] on load.
    pub mask: PathBuf,
    #[serde(default)]
    pub params: PostprocessParams,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct OutputConfig {
    pub cropped_image: Option<PathBuf>,
    pub binary_mask: Option<PathBuf>,
    /// Cluster `k` is written to `<dir>/cluster_<k>.png`.
    pub cluster_dir: Option<PathBuf>,
    pub report_json: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<ToolConfig> {
    let data = fs::read_to_string(path).map_err(|e| {
        PanelError::Config(format!("failed to read config {}: {e}", path.display()))
    })?;
    parse_config(&data)
        .map_err(|e| PanelError::Config(format!("failed to parse config {}: {e}", path.display())))
}

fn parse_config(data: &str) -> serde_json::Result<ToolConfig> {
    serde_json::from_str(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_default_params() {
        let cfg = parse_config(r#"{ "input": "a.png", "mask": "m.png" }"#).unwrap();
        assert_eq!(cfg.input, PathBuf::from("a.png"));
        assert_eq!(cfg.params.number_lines, 10);
        assert!(cfg.params.number_clusters.is_none());
        assert!(cfg.output.report_json.is_none());
    }

    #[test]
    fn nested_params_override_defaults() {
        let cfg = parse_config(
            r#"{
                "input": "a.png",
                "mask": "m.png",
                "params": { "mask_threshold": 0.5, "cluster": { "random_seed": 9 } },
                "output": { "cluster_dir": "out" }
            }"#,
        )
        .unwrap();
        assert!((cfg.params.mask_threshold - 0.5).abs() < f32::EPSILON);
        assert_eq!(cfg.params.cluster.random_seed, 9);
        assert_eq!(cfg.params.cluster.weight_epsilon, 1e-3);
        assert_eq!(cfg.output.cluster_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = load_config(Path::new("/nonexistent/panel.json")).unwrap_err();
        assert!(matches!(err, PanelError::Config(_)));
    }
}
