//! Error types for the pitch simulation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PitchError {
    #[error("invalid trajectory for pitch type {pitch_type:?}: {reason}")]
    InvalidTrajectory { pitch_type: String, reason: String },

    #[error("failed to load pitch data: {0}")]
    DataLoad(String),

    #[error("unknown pitch type: {0}")]
    UnknownPitchType(String),

    #[error("no pitches for pitcher {pitcher:?} of team {team:?}")]
    UnknownGroup { team: String, pitcher: String },

    #[error("invalid time step: {0}")]
    InvalidTimeStep(f64),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl From<std::io::Error> for PitchError {
    fn from(err: std::io::Error) -> Self {
        PitchError::DataLoad(err.to_string())
    }
}

impl From<serde_json::Error> for PitchError {
    fn from(err: serde_json::Error) -> Self {
        PitchError::DataLoad(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PitchError>;
