// THEORY:
// Runner configuration: everything deployment-specific lives here: camera
// geometry, the sampling cadence, the lamp's BLE addressing, and where the
// music assets live. The pipeline's own thresholds ride along as a nested
// section so a single JSON file describes the whole installation. Every field
// defaults, so running with no config file at all is always valid.

use anyhow::Context;
use mood_engine::pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Deployment configuration for the frame-loop runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Capture width in pixels. Kept low to keep classification fast.
    pub camera_width: u32,
    /// Capture height in pixels.
    pub camera_height: u32,
    /// Classify every Nth frame; the frames in between reuse the committed
    /// state untouched.
    pub frame_skip: u64,
    /// MAC address of the BLE lamp, colon-separated hex.
    pub lamp_address: String,
    /// GATT service UUID exposing the lamp's control characteristic.
    pub lamp_service_uuid: String,
    /// UUID of the writable control characteristic.
    pub lamp_characteristic_uuid: String,
    /// Directory the label-addressed track paths resolve against.
    pub music_dir: PathBuf,
    /// Stabilization thresholds, overridable per installation.
    pub pipeline: PipelineConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            camera_width: 640,
            camera_height: 480,
            frame_skip: 5,
            lamp_address: "AA:BB:CC:DD:EE:FF".to_string(),
            lamp_service_uuid: "0000fe01-0000-1000-8000-00805f9b34fb".to_string(),
            lamp_characteristic_uuid: "0000ff01-0000-1000-8000-00805f9b34fb".to_string(),
            music_dir: PathBuf::from("."),
            pipeline: PipelineConfig::default(),
        }
    }
}

/// Loads the configuration, falling back to defaults when no path is given.
pub fn load(path: Option<&Path>) -> anyhow::Result<RunnerConfig> {
    match path {
        None => Ok(RunnerConfig::default()),
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing config file {}", path.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_shipped_constants() {
        let config = RunnerConfig::default();
        assert_eq!(config.camera_width, 640);
        assert_eq!(config.camera_height, 480);
        assert_eq!(config.frame_skip, 5);
        assert_eq!(config.pipeline.pattern_window, 10);
    }

    #[test]
    fn partial_json_overrides_only_what_it_names() {
        let parsed: RunnerConfig = serde_json::from_str(
            r#"{ "frame_skip": 2, "pipeline": { "fatigue_min": 7 } }"#,
        )
        .unwrap();
        assert_eq!(parsed.frame_skip, 2);
        assert_eq!(parsed.pipeline.fatigue_min, 7);
        // Untouched fields keep their defaults.
        assert_eq!(parsed.camera_width, 640);
        assert_eq!(parsed.pipeline.focus_min, 8);
    }
}
