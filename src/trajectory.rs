//! Constant-acceleration kinematics for pitch trajectories.
//!
//! Every axis is integrated independently in closed form:
//!
//! ```text
//! p(t) = release + v*t + 0.5*a*t²
//! ```
//!
//! The functions here are stateless. Looping and freezing on arrival are the
//! controller's business.

use crate::error::{PitchError, Result};
use crate::pitch::PitchTrajectory;
use nalgebra::Vector3;

/// Index of the downrange axis (release towards plate) in the model frame.
pub const DOWNRANGE_AXIS: usize = 2;
/// Index of the height axis in the model frame.
pub const HEIGHT_AXIS: usize = 1;

const EPSILON: f64 = 1e-12;

pub fn position_at(trajectory: &PitchTrajectory, t: f64) -> Result<Vector3<f64>> {
    if !t.is_finite() || t < 0. {
        return Err(PitchError::InvalidTrajectory {
            pitch_type: trajectory.pitch_type().to_string(),
            reason: format!("elapsed time {} out of range", t),
        });
    }
    let position =
        trajectory.release() + trajectory.velocity() * t + trajectory.acceleration() * (0.5 * t * t);
    if !position.iter().all(|c| c.is_finite()) {
        return Err(PitchError::InvalidTrajectory {
            pitch_type: trajectory.pitch_type().to_string(),
            reason: format!("non-finite position at t={}", t),
        });
    }
    Ok(position)
}

/// Sign of travel along the downrange axis needed to reach the plate.
fn plate_direction(trajectory: &PitchTrajectory, plate_distance: f64) -> f64 {
    let gap = plate_distance - trajectory.release()[DOWNRANGE_AXIS];
    if gap > 0. {
        1.
    } else if gap < 0. {
        -1.
    } else {
        0.
    }
}

/// Whether `position` has reached or passed the plate plane.
pub fn has_arrived(
    trajectory: &PitchTrajectory,
    position: &Vector3<f64>,
    plate_distance: f64,
) -> bool {
    let direction = plate_direction(trajectory, plate_distance);
    (position[DOWNRANGE_AXIS] - plate_distance) * direction >= 0.
}

/// Earliest non-negative time at which the ball crosses the plate plane.
pub fn arrival_time(trajectory: &PitchTrajectory, plate_distance: f64) -> Option<f64> {
    // 0.5*a*t² + v*t + (p0 - plate) = 0.
    let a = 0.5 * trajectory.acceleration()[DOWNRANGE_AXIS];
    let b = trajectory.velocity()[DOWNRANGE_AXIS];
    let c = trajectory.release()[DOWNRANGE_AXIS] - plate_distance;
    if c == 0. {
        return Some(0.);
    }

    if a.abs() < EPSILON {
        if b.abs() < EPSILON {
            return None;
        }
        let t = -c / b;
        return if t >= 0. { Some(t) } else { None };
    }

    let disc = b * b - 4. * a * c;
    if disc < 0. {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let root0 = (-b - sqrt_disc) / (2. * a);
    let root1 = (-b + sqrt_disc) / (2. * a);
    let (first, second) = if root0 <= root1 {
        (root0, root1)
    } else {
        (root1, root0)
    };
    if first >= 0. {
        Some(first)
    } else if second >= 0. {
        Some(second)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::PitchType;
    use approx::assert_relative_eq;

    fn trajectory(release: Vector3<f64>, velocity: Vector3<f64>, accel: Vector3<f64>) -> PitchTrajectory {
        PitchTrajectory::new(PitchType::from("FF"), release, velocity, accel).unwrap()
    }

    #[test]
    fn starts_at_release() {
        let t = trajectory(
            Vector3::new(-1.2, 6.1, -2.03),
            Vector3::new(3., -5., -135.),
            Vector3::new(-10., -15., 28.),
        );
        assert_eq!(position_at(&t, 0.).unwrap(), *t.release());
    }

    #[test]
    fn uniform_motion_is_exact() {
        let t = trajectory(Vector3::zeros(), Vector3::new(0., 0., 7.5), Vector3::zeros());
        for &time in &[0., 0.25, 1., 3.5] {
            assert_eq!(position_at(&t, time).unwrap(), Vector3::new(0., 0., 7.5 * time));
        }
    }

    #[test]
    fn rejects_negative_time() {
        let t = trajectory(Vector3::zeros(), Vector3::zeros(), Vector3::zeros());
        assert!(position_at(&t, -0.1).is_err());
        assert!(position_at(&t, f64::INFINITY).is_err());
    }

    #[test]
    fn overflow_is_reported() {
        let t = trajectory(
            Vector3::zeros(),
            Vector3::new(f64::MAX, 0., -1.),
            Vector3::zeros(),
        );
        assert!(position_at(&t, 2.).is_err());
    }

    #[test]
    fn arrival_follows_travel_direction() {
        let towards_negative = trajectory(
            Vector3::new(0., 0., -2.03),
            Vector3::new(0., 0., -20.),
            Vector3::zeros(),
        );
        assert!(!has_arrived(&towards_negative, &Vector3::new(0., 0., -60.), -60.5));
        assert!(has_arrived(&towards_negative, &Vector3::new(0., 0., -60.5), -60.5));
        assert!(has_arrived(&towards_negative, &Vector3::new(0., 0., -61.), -60.5));

        let towards_positive = trajectory(Vector3::zeros(), Vector3::new(0., 0., 10.), Vector3::zeros());
        assert!(!has_arrived(&towards_positive, &Vector3::new(0., 0., 49.), 50.));
        assert!(has_arrived(&towards_positive, &Vector3::new(0., 0., 50.), 50.));
    }

    #[test]
    fn arrival_time_linear_and_quadratic() {
        let linear = trajectory(
            Vector3::new(0., 0., -2.03),
            Vector3::new(0., 0., -20.),
            Vector3::zeros(),
        );
        assert_relative_eq!(arrival_time(&linear, -60.5).unwrap(), 58.47 / 20., epsilon = 1e-12);

        let decelerating = trajectory(
            Vector3::new(0., 0., -2.03),
            Vector3::new(0., 0., -130.),
            Vector3::new(0., 0., 25.),
        );
        let t = arrival_time(&decelerating, -60.5).unwrap();
        let p = position_at(&decelerating, t).unwrap();
        assert_relative_eq!(p.z, -60.5, epsilon = 1e-9);
        assert!(t > 58.47 / 130.);
    }

    #[test]
    fn never_arrives_when_moving_away() {
        let away = trajectory(Vector3::zeros(), Vector3::new(0., 0., 10.), Vector3::zeros());
        assert_eq!(arrival_time(&away, -60.5), None);
        let stalled = trajectory(Vector3::zeros(), Vector3::zeros(), Vector3::zeros());
        assert_eq!(arrival_time(&stalled, -60.5), None);
    }
}
