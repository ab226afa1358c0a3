use super::OutputConfig;
use crate::measure::MeasureParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration of `plate_height_demo`.
#[derive(Debug, Deserialize)]
pub struct PlateDemoConfig {
    /// Rectified plate patch (PNG/JPEG).
    #[serde(rename = "input")]
    pub input: PathBuf,
    #[serde(default)]
    pub measure: MeasureParams,
    #[serde(default)]
    pub overlay: OverlayConfig,
    pub output: OutputConfig,
}

/// Colors of the debug overlay.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub coarse_color: [u8; 3],
    pub refined_color: [u8; 3],
    /// Also write the cleaned threshold mask.
    pub save_mask: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            coarse_color: [255, 0, 0],
            refined_color: [0, 255, 0],
            save_mask: false,
        }
    }
}

pub fn load_config(path: &Path) -> Result<PlateDemoConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg: PlateDemoConfig =
            serde_json::from_str(r#"{"input": "plate.png", "output": {"dir": "out"}}"#)
                .expect("valid config");
        assert_eq!(cfg.input, PathBuf::from("plate.png"));
        assert!(cfg.measure.white_balance);
        assert_eq!(cfg.overlay.refined_color, [0, 255, 0]);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_config(Path::new("does/not/exist.json")).expect_err("no such file");
        assert!(err.contains("does/not/exist.json"));
    }
}
