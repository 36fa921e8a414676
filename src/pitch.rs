use crate::error::{PitchError, Result};
use nalgebra::Vector3;
use std::fmt;

/// Short pitch code such as "FF" or "SL". Only used for filtering and coloring.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PitchType(String);

impl PitchType {
    pub fn new(code: impl Into<String>) -> PitchType {
        PitchType(code.into())
    }

    pub fn code(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PitchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PitchType {
    fn from(code: &str) -> Self {
        PitchType::new(code)
    }
}

/// Immutable physical description of one pitch in the model frame.
///
/// x is lateral, y is height and z is downrange, with the plate at negative z.
#[derive(Clone, Debug, PartialEq)]
pub struct PitchTrajectory {
    pitch_type: PitchType,
    release: Vector3<f64>,
    velocity: Vector3<f64>,
    acceleration: Vector3<f64>,
}

impl PitchTrajectory {
    pub fn new(
        pitch_type: PitchType,
        release: Vector3<f64>,
        velocity: Vector3<f64>,
        acceleration: Vector3<f64>,
    ) -> Result<PitchTrajectory> {
        if pitch_type.code().trim().is_empty() {
            return Err(PitchError::InvalidTrajectory {
                pitch_type: pitch_type.0,
                reason: "empty pitch type code".to_string(),
            });
        }
        for (name, vector) in [
            ("release", &release),
            ("velocity", &velocity),
            ("acceleration", &acceleration),
        ]
        .iter()
        {
            if !vector.iter().all(|c| c.is_finite()) {
                return Err(PitchError::InvalidTrajectory {
                    pitch_type: pitch_type.0,
                    reason: format!("non-finite {} {:?}", name, vector.as_slice()),
                });
            }
        }
        Ok(PitchTrajectory {
            pitch_type,
            release,
            velocity,
            acceleration,
        })
    }

    pub fn pitch_type(&self) -> &PitchType {
        &self.pitch_type
    }

    pub fn release(&self) -> &Vector3<f64> {
        &self.release
    }

    pub fn velocity(&self) -> &Vector3<f64> {
        &self.velocity
    }

    pub fn acceleration(&self) -> &Vector3<f64> {
        &self.acceleration
    }
}
