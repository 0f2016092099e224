use serde::{Deserialize, Serialize};
use std::path::Path;
use trajectory::TrajectoryRequest;

pub const DEFAULT_CONFIG_PATH: &str = "config/pick_place.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Sleep one sample period between streamed samples.
    #[serde(default = "default_realtime")]
    pub realtime: bool,
    pub trajectory: TrajectoryRequest,
}

fn default_realtime() -> bool {
    true
}

impl MotionConfig {
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("failed to read {}: {e}", path.as_ref().display()))?;
        Ok(Self::from_yaml(&text)?)
    }
}
