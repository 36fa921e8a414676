use crate::pitch::{PitchTrajectory, PitchType};
use nalgebra::Vector3;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u64);

#[derive(Clone, Debug, PartialEq)]
pub enum BallState {
    Flying,
    /// Crossed the plate and frozen there.
    Arrived,
    /// The model failed for this ball; it never advances or shows again.
    Inert { reason: String, reported: bool },
}

/// One animated ball bound to a shared trajectory.
#[derive(Clone, Debug, PartialEq)]
pub struct BallInstance {
    pub id: InstanceId,
    pub trajectory: Arc<PitchTrajectory>,
    pub elapsed: f64,
    pub position: Vector3<f64>,
    pub visible: bool,
    pub loops: u64,
    pub state: BallState,
}

impl BallInstance {
    pub fn new(id: InstanceId, trajectory: Arc<PitchTrajectory>) -> BallInstance {
        BallInstance {
            id,
            position: *trajectory.release(),
            trajectory,
            elapsed: 0.,
            visible: false,
            loops: 0,
            state: BallState::Flying,
        }
    }

    pub fn pitch_type(&self) -> &PitchType {
        self.trajectory.pitch_type()
    }

    pub fn is_inert(&self) -> bool {
        matches!(self.state, BallState::Inert { .. })
    }
}
