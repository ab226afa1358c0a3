use super::OutputConfig;
use crate::measure::MeasureParams;
use crate::pipeline::ParallelOptions;
use crate::speed::SpeedParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration of `speed_demo`.
///
/// Heights come either from a serialized `Video` (`video`) or from one plate
/// patch per frame (`plate_images`, `null` for frames without a plate), which
/// are then measured by the demo.
#[derive(Debug, Deserialize)]
pub struct SpeedDemoConfig {
    #[serde(default)]
    pub video: Option<PathBuf>,
    #[serde(default)]
    pub plate_images: Vec<Option<PathBuf>>,
    #[serde(default)]
    pub measure: MeasureParams,
    #[serde(default)]
    pub speed: SpeedParams,
    #[serde(default)]
    pub parallel: ParallelOptions,
    pub output: OutputConfig,
}

pub fn load_config(path: &Path) -> Result<SpeedDemoConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: SpeedDemoConfig = serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    if config.video.is_none() && config.plate_images.is_empty() {
        return Err(format!(
            "Config {} needs either \"video\" or \"plate_images\"",
            path.display()
        ));
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plate_list_with_gaps_parses() {
        let cfg: SpeedDemoConfig = serde_json::from_str(
            r#"{
                "plate_images": ["f0.png", null, "f2.png"],
                "speed": {"frame_rate": 30},
                "output": {"dir": "out"}
            }"#,
        )
        .expect("valid config");
        assert_eq!(cfg.plate_images.len(), 3);
        assert!(cfg.plate_images[1].is_none());
        assert_eq!(cfg.speed.frame_rate, 30.0);
        assert_eq!(cfg.speed.lens_factor, 343.0);
    }
}
