//! Owns the animated balls, the active pitch-type filter and the clock.
//!
//! Balls live in a legion [`World`] and are advanced by a small schedule of
//! systems. Deselecting a pitch type hides its balls: they keep their elapsed
//! time and do not advance, so enabling the type again resumes them mid-flight.

use crate::{
    ball::{BallInstance, InstanceId},
    data::PitchCatalog,
    error::{PitchError, Result},
    filter::ActiveFilter,
    pitch::{PitchTrajectory, PitchType},
    render::{RenderSink, SceneAdapter},
    simulation::{FailureLog, FailureReport, SimulationConfig, SimulationData},
};
use legion::{IntoQuery, Resources, Schedule, World};
use log::{debug, info, warn};
use nalgebra::Vector3;
use std::sync::Arc;

/// What the rendering side needs to know about one ball after a tick.
#[derive(Clone, Debug, PartialEq)]
pub struct BallFrame {
    pub id: InstanceId,
    pub pitch_type: PitchType,
    pub position: Vector3<f64>,
    pub visible: bool,
}

pub struct AnimationController {
    world: World,
    resources: Resources,
    schedule: Schedule,
    next_id: u64,
}

impl AnimationController {
    pub fn new(config: SimulationConfig) -> AnimationController {
        let mut resources = Resources::default();
        resources.insert(config);
        resources.insert(SimulationData {
            time_delta: config.time_delta,
            ..SimulationData::default()
        });
        resources.insert(ActiveFilter::default());
        resources.insert(FailureLog::default());

        let schedule = Schedule::builder()
            .add_system(crate::advance::advance_pitches_system())
            .flush()
            .add_system(crate::advance::report_failures_system())
            .build();

        AnimationController {
            world: World::default(),
            resources,
            schedule,
            next_id: 0,
        }
    }

    pub fn config(&self) -> SimulationConfig {
        self.resources
            .get::<SimulationConfig>()
            .map(|config| *config)
            .unwrap_or_default()
    }

    /// Advances every visible ball by `dt` seconds. Does nothing while paused.
    pub fn tick(&mut self, dt: f64) -> Result<()> {
        if !dt.is_finite() || dt < 0. {
            return Err(PitchError::InvalidTimeStep(dt));
        }
        {
            let mut data = match self.resources.get_mut::<SimulationData>() {
                Some(data) => data,
                None => return Ok(()),
            };
            if data.paused {
                return Ok(());
            }
            data.time_delta = dt;
            data.time += dt;
            data.ticks += 1;
        }
        self.schedule.execute(&mut self.world, &mut self.resources);
        Ok(())
    }

    /// Enables or disables a pitch type. Returns how many balls have that type.
    pub fn set_active(&mut self, pitch_type: &PitchType, enabled: bool) -> usize {
        let filter_enabled = {
            let mut filter = match self.resources.get_mut::<ActiveFilter>() {
                Some(filter) => filter,
                None => return 0,
            };
            filter.set(pitch_type, enabled);
            filter.contains(pitch_type)
        };

        let mut matched = 0;
        for ball in <&mut BallInstance>::query().iter_mut(&mut self.world) {
            if ball.trajectory.pitch_type() != pitch_type {
                continue;
            }
            matched += 1;
            ball.visible = filter_enabled && !ball.is_inert();
        }
        if matched == 0 {
            warn!("No balls of pitch type {} to toggle", pitch_type);
        } else {
            debug!("Pitch type {} enabled={} ({} balls)", pitch_type, enabled, matched);
        }
        matched
    }

    pub fn is_active(&self, pitch_type: &PitchType) -> bool {
        self.resources
            .get::<ActiveFilter>()
            .map_or(false, |filter| filter.contains(pitch_type))
    }

    pub fn active_types(&self) -> Vec<PitchType> {
        self.resources
            .get::<ActiveFilter>()
            .map(|filter| filter.types())
            .unwrap_or_default()
    }

    pub fn set_paused(&mut self, paused: bool) {
        if let Some(mut data) = self.resources.get_mut::<SimulationData>() {
            data.paused = paused;
        }
    }

    pub fn toggle_paused(&mut self) -> bool {
        let paused = !self.is_paused();
        self.set_paused(paused);
        paused
    }

    pub fn is_paused(&self) -> bool {
        self.resources
            .get::<SimulationData>()
            .map_or(false, |data| data.paused)
    }

    /// Replaces every ball with fresh hidden ones, clears the filter and drops
    /// failures nobody took yet.
    pub fn reset<I>(&mut self, trajectories: I)
    where
        I: IntoIterator<Item = Arc<PitchTrajectory>>,
    {
        self.world.clear();
        if let Some(mut filter) = self.resources.get_mut::<ActiveFilter>() {
            filter.clear();
        }
        // Reports name balls that are gone now.
        if let Some(mut failure_log) = self.resources.get_mut::<FailureLog>() {
            failure_log.reports.clear();
        }

        let mut balls = Vec::<(BallInstance,)>::new();
        for trajectory in trajectories {
            balls.push((BallInstance::new(InstanceId(self.next_id), trajectory),));
            self.next_id += 1;
        }
        info!("Loaded {} balls", balls.len());
        self.world.extend(balls);
    }

    /// Swaps in the pitches of one pitcher. Returns their pitch types, sorted.
    pub fn select_group(
        &mut self,
        catalog: &PitchCatalog,
        team: &str,
        pitcher: &str,
    ) -> Result<Vec<PitchType>> {
        let trajectories = catalog
            .trajectories(team, pitcher)
            .ok_or_else(|| PitchError::UnknownGroup {
                team: team.to_string(),
                pitcher: pitcher.to_string(),
            })?;
        info!("Selected {} / {}", team, pitcher);
        self.reset(trajectories.iter().cloned());
        Ok(catalog.pitch_types(team, pitcher))
    }

    /// Selects the first pitcher of `team` in sorted order.
    pub fn select_team(
        &mut self,
        catalog: &PitchCatalog,
        team: &str,
    ) -> Result<(String, Vec<PitchType>)> {
        let pitcher = catalog
            .pitchers(team)
            .into_iter()
            .next()
            .ok_or_else(|| PitchError::UnknownGroup {
                team: team.to_string(),
                pitcher: String::new(),
            })?;
        let types = self.select_group(catalog, team, &pitcher)?;
        Ok((pitcher, types))
    }

    pub fn frames(&self) -> Vec<BallFrame> {
        let mut frames: Vec<BallFrame> = <&BallInstance>::query()
            .iter(&self.world)
            .map(|ball| BallFrame {
                id: ball.id,
                pitch_type: ball.pitch_type().clone(),
                position: ball.position,
                visible: ball.visible,
            })
            .collect();
        frames.sort_by_key(|frame| frame.id);
        frames
    }

    pub fn instances(&self) -> Vec<BallInstance> {
        let mut balls: Vec<BallInstance> = <&BallInstance>::query()
            .iter(&self.world)
            .cloned()
            .collect();
        balls.sort_by_key(|ball| ball.id);
        balls
    }

    pub fn visible_ids(&self) -> Vec<InstanceId> {
        self.frames()
            .into_iter()
            .filter(|frame| frame.visible)
            .map(|frame| frame.id)
            .collect()
    }

    /// Sends the current frame to a renderer.
    pub fn publish(&self, adapter: &mut SceneAdapter, sink: &mut dyn RenderSink) {
        sink.begin_frame(self.time());
        for frame in self.frames() {
            sink.draw_ball(&adapter.scene_ball(&frame));
        }
        sink.end_frame();
    }

    pub fn take_failures(&mut self) -> Vec<FailureReport> {
        self.resources
            .get_mut::<FailureLog>()
            .map(|mut log| std::mem::take(&mut log.reports))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        <&BallInstance>::query().iter(&self.world).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn time(&self) -> f64 {
        self.resources
            .get::<SimulationData>()
            .map_or(0., |data| data.time)
    }

    pub fn ticks(&self) -> u64 {
        self.resources
            .get::<SimulationData>()
            .map_or(0, |data| data.ticks)
    }
}
