use legion::*;
use log::warn;

use crate::{
    ball::{BallInstance, BallState},
    filter::ActiveFilter,
    simulation::{ArrivalPolicy, FailureLog, FailureReport, SimulationConfig, SimulationData},
    trajectory::{has_arrived, position_at},
};

#[system(for_each)]
pub fn advance_pitches(
    ball: &mut BallInstance,
    #[resource] simulation_data: &SimulationData,
    #[resource] simulation_config: &SimulationConfig,
    #[resource] filter: &ActiveFilter,
) {
    advance_single_pitch(ball, simulation_data.time_delta, simulation_config, filter);
}

#[system(for_each)]
pub fn report_failures(ball: &mut BallInstance, #[resource] failure_log: &mut FailureLog) {
    if let BallState::Inert { reason, reported } = &mut ball.state {
        if *reported {
            return;
        }
        *reported = true;
        warn!(
            "Ball {:?} ({}) disabled: {}",
            ball.id,
            ball.trajectory.pitch_type(),
            reason
        );
        failure_log.reports.push(FailureReport {
            id: ball.id,
            pitch_type: ball.trajectory.pitch_type().clone(),
            reason: reason.clone(),
        });
    }
}

/// Advances one ball by `dt`. Touches nothing but `ball`.
pub fn advance_single_pitch(
    ball: &mut BallInstance,
    dt: f64,
    config: &SimulationConfig,
    filter: &ActiveFilter,
) {
    if ball.is_inert() {
        ball.visible = false;
        return;
    }
    ball.visible = filter.contains(ball.trajectory.pitch_type());
    // Hidden balls keep their clock where it was.
    if !ball.visible || ball.state == BallState::Arrived {
        return;
    }

    let next_t = ball.elapsed + dt;
    let position = match position_at(&ball.trajectory, next_t) {
        Ok(position) => position,
        Err(err) => {
            ball.visible = false;
            ball.state = BallState::Inert {
                reason: err.to_string(),
                reported: false,
            };
            return;
        }
    };

    if !has_arrived(&ball.trajectory, &position, config.plate_distance) {
        ball.elapsed = next_t;
        ball.position = position;
        return;
    }

    match config.arrival {
        ArrivalPolicy::Loop => {
            ball.elapsed = 0.;
            ball.position = *ball.trajectory.release();
            ball.loops += 1;
            ball.state = BallState::Flying;
        }
        ArrivalPolicy::Freeze => {
            ball.elapsed = next_t;
            ball.position = position;
            ball.state = BallState::Arrived;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ball::InstanceId;
    use crate::pitch::{PitchTrajectory, PitchType};
    use nalgebra::Vector3;
    use std::sync::Arc;

    fn fastball() -> BallInstance {
        let trajectory = PitchTrajectory::new(
            PitchType::from("FF"),
            Vector3::new(0., 6., -2.03),
            Vector3::new(0., 0., -20.),
            Vector3::new(0., -32.2, 0.),
        )
        .unwrap();
        BallInstance::new(InstanceId(0), Arc::new(trajectory))
    }

    fn enabled() -> ActiveFilter {
        let mut filter = ActiveFilter::default();
        filter.set(&PitchType::from("FF"), true);
        filter
    }

    #[test]
    fn hidden_ball_keeps_its_clock() {
        let mut ball = fastball();
        let config = SimulationConfig::default();
        advance_single_pitch(&mut ball, 0.5, &config, &enabled());
        assert_eq!(ball.elapsed, 0.5);
        advance_single_pitch(&mut ball, 0.5, &config, &ActiveFilter::default());
        assert_eq!(ball.elapsed, 0.5);
        assert!(!ball.visible);
    }

    #[test]
    fn loops_after_crossing_plate() {
        let mut ball = fastball();
        let config = SimulationConfig::default();
        // Arrival at 58.47 / 20 = 2.9235s.
        advance_single_pitch(&mut ball, 2.9, &config, &enabled());
        assert_eq!(ball.loops, 0);
        advance_single_pitch(&mut ball, 0.1, &config, &enabled());
        assert_eq!(ball.elapsed, 0.);
        assert_eq!(ball.loops, 1);
        assert_eq!(ball.position, *ball.trajectory.release());
    }

    #[test]
    fn freezes_when_configured() {
        let mut ball = fastball();
        let config = SimulationConfig {
            arrival: ArrivalPolicy::Freeze,
            ..SimulationConfig::default()
        };
        advance_single_pitch(&mut ball, 3., &config, &enabled());
        assert_eq!(ball.state, BallState::Arrived);
        let frozen = ball.position;
        advance_single_pitch(&mut ball, 1., &config, &enabled());
        assert_eq!(ball.elapsed, 3.);
        assert_eq!(ball.position, frozen);
        assert!(ball.visible);
    }
}
