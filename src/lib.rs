pub mod advance;
pub mod ball;
pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod filter;
pub mod logging;
pub mod pitch;
pub mod render;
pub mod simulation;
pub mod trajectory;
pub mod world_gen;

pub use ball::{BallInstance, BallState, InstanceId};
pub use controller::{AnimationController, BallFrame};
pub use data::{IngestConfig, PitchCatalog, PitchRecord};
pub use error::{PitchError, Result};
pub use pitch::{PitchTrajectory, PitchType};
pub use simulation::{ArrivalPolicy, SimulationConfig};
