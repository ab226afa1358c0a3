//! JSON configuration of the demo binaries.

pub mod plate_demo;
pub mod speed_demo;

use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(rename = "dir")]
    pub dir: PathBuf,
}
