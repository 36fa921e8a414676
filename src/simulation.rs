use crate::ball::InstanceId;
use crate::pitch::PitchType;
use serde::Deserialize;

/// What a ball does once it crosses the plate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrivalPolicy {
    /// Restart from the release point.
    Loop,
    /// Stay at the crossing point.
    Freeze,
}

impl Default for ArrivalPolicy {
    fn default() -> Self {
        ArrivalPolicy::Loop
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Step used by the frame loop, seconds.
    pub time_delta: f64,
    /// Downrange coordinate of the plate, feet.
    pub plate_distance: f64,
    pub arrival: ArrivalPolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            time_delta: 1. / 60.,
            plate_distance: -60.5,
            arrival: ArrivalPolicy::Loop,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimulationData {
    pub time: f64,
    pub time_delta: f64,
    pub ticks: u64,
    pub paused: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FailureReport {
    pub id: InstanceId,
    pub pitch_type: PitchType,
    pub reason: String,
}

#[derive(Clone, Debug, Default)]
pub struct FailureLog {
    pub reports: Vec<FailureReport>,
}

pub fn adjust_simulation_speed(config: &mut SimulationConfig, factor: f64) {
    config.time_delta *= factor;
}
