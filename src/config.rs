use crate::{
    data::IngestConfig, error::Result, render::SceneConfig, simulation::SimulationConfig,
};
use serde::Deserialize;
use std::path::Path;

/// Everything the command line runner can be configured with. Missing
/// sections fall back to their defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub simulation: SimulationConfig,
    pub ingest: IngestConfig,
    pub scene: SceneConfig,
}

impl AppConfig {
    pub fn from_json_str(json: &str) -> Result<AppConfig> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::ArrivalPolicy;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = AppConfig::from_json_str(
            r#"{"simulation": {"arrival": "freeze"}, "scene": {"ground_offset": 0.0}}"#,
        )
        .unwrap();
        assert_eq!(config.simulation.arrival, ArrivalPolicy::Freeze);
        assert_eq!(config.simulation.plate_distance, -60.5);
        assert_eq!(config.scene.ground_offset, 0.);
        assert_eq!(config.scene.ball_radius, 0.145);
        assert_eq!(config.ingest.release_downrange, -2.03);
    }

    #[test]
    fn empty_config_is_default() {
        assert_eq!(AppConfig::from_json_str("{}").unwrap(), AppConfig::default());
    }
}
