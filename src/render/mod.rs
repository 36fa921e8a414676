//! Bridge between the simulation and whatever draws the balls.
//!
//! The model frame already matches the scene axes. The only reconciliation left
//! is the ground offset: the scene floor sits below the release reference.

use crate::{
    ball::InstanceId,
    controller::BallFrame,
    error::{PitchError, Result},
    pitch::PitchType,
};
use fnv::{FnvHashMap, FnvHashSet};
use log::{debug, warn};
use nalgebra::Vector3;
use serde::Deserialize;

const PITCH_COLORS: [(&str, u32); 16] = [
    ("FF", 0xFF0000),
    ("SI", 0xFDB927),
    ("FT", 0xFF8C00),
    ("SL", 0x0000FF),
    ("ST", 0x00BFFF),
    ("CU", 0x8A2BE2),
    ("KC", 0x4B0082),
    ("CH", 0x008000),
    ("FS", 0x20B2AA),
    ("FC", 0xA52A2A),
    ("FO", 0xDAA520),
    ("SC", 0xDE3163),
    ("EP", 0xFF69B4),
    ("KN", 0x708090),
    ("SV", 0xFF1493),
    ("CS", 0xBA55D3),
];
const NEUTRAL_COLOR: u32 = 0xFFFFFF;

fn rgb(hex: u32) -> Vector3<f32> {
    Vector3::new(
        ((hex >> 16) & 0xFF) as f32 / 255.,
        ((hex >> 8) & 0xFF) as f32 / 255.,
        (hex & 0xFF) as f32 / 255.,
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Added to the model height to get the scene height.
    pub ground_offset: f64,
    pub ball_radius: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            ground_offset: 0.65,
            ball_radius: 0.145,
        }
    }
}

pub struct PitchPalette {
    colors: FnvHashMap<PitchType, Vector3<f32>>,
    warned: FnvHashSet<PitchType>,
}

impl Default for PitchPalette {
    fn default() -> Self {
        PitchPalette {
            colors: PITCH_COLORS
                .iter()
                .map(|&(code, hex)| (PitchType::from(code), rgb(hex)))
                .collect(),
            warned: FnvHashSet::default(),
        }
    }
}

impl PitchPalette {
    pub fn color(&self, pitch_type: &PitchType) -> Result<Vector3<f32>> {
        self.colors
            .get(pitch_type)
            .copied()
            .ok_or_else(|| PitchError::UnknownPitchType(pitch_type.to_string()))
    }

    /// Like [`color`](Self::color) but falls back to white, warning once per code.
    pub fn color_or_neutral(&mut self, pitch_type: &PitchType) -> Vector3<f32> {
        match self.color(pitch_type) {
            Ok(color) => color,
            Err(err) => {
                if self.warned.insert(pitch_type.clone()) {
                    warn!("{}, drawing it in the neutral color", err);
                }
                rgb(NEUTRAL_COLOR)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneBall {
    pub id: InstanceId,
    pub pitch_type: PitchType,
    pub position: [f32; 3],
    pub color: Vector3<f32>,
    pub radius: f32,
    pub visible: bool,
}

#[derive(Default)]
pub struct SceneAdapter {
    pub config: SceneConfig,
    pub palette: PitchPalette,
}

impl SceneAdapter {
    pub fn new(config: SceneConfig) -> SceneAdapter {
        SceneAdapter {
            config,
            palette: PitchPalette::default(),
        }
    }

    pub fn scene_position(&self, model: &Vector3<f64>) -> [f32; 3] {
        [
            model.x as f32,
            (model.y + self.config.ground_offset) as f32,
            model.z as f32,
        ]
    }

    pub fn scene_ball(&mut self, frame: &BallFrame) -> SceneBall {
        SceneBall {
            id: frame.id,
            pitch_type: frame.pitch_type.clone(),
            position: self.scene_position(&frame.position),
            color: self.palette.color_or_neutral(&frame.pitch_type),
            radius: self.config.ball_radius,
            visible: frame.visible,
        }
    }
}

/// Receives one frame of balls per tick.
pub trait RenderSink {
    fn begin_frame(&mut self, _time: f64) {}
    fn draw_ball(&mut self, ball: &SceneBall);
    fn end_frame(&mut self) {}
}

/// Writes visible balls to the log. Used by the command line runner.
#[derive(Default)]
pub struct LogSink {
    pub frames: u64,
    drawn: usize,
}

impl RenderSink for LogSink {
    fn begin_frame(&mut self, _time: f64) {
        self.drawn = 0;
    }

    fn draw_ball(&mut self, ball: &SceneBall) {
        if !ball.visible {
            return;
        }
        self.drawn += 1;
        debug!(
            "{:?} {} at ({:.2}, {:.2}, {:.2})",
            ball.id, ball.pitch_type, ball.position[0], ball.position[1], ball.position[2]
        );
    }

    fn end_frame(&mut self) {
        self.frames += 1;
        debug!("Frame {}: {} balls drawn", self.frames, self.drawn);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn known_and_unknown_colors() {
        let mut palette = PitchPalette::default();
        assert_eq!(palette.color(&PitchType::from("FF")).unwrap(), Vector3::new(1., 0., 0.));
        assert!(matches!(
            palette.color(&PitchType::from("XX")),
            Err(PitchError::UnknownPitchType(_))
        ));
        assert_eq!(
            palette.color_or_neutral(&PitchType::from("XX")),
            Vector3::new(1., 1., 1.)
        );
    }

    #[test]
    fn lifts_height_by_ground_offset() {
        let mut adapter = SceneAdapter::default();
        let ball = adapter.scene_ball(&BallFrame {
            id: InstanceId(3),
            pitch_type: PitchType::from("CH"),
            position: Vector3::new(-2., 5.5, -30.),
            visible: true,
        });
        assert_eq!(ball.position[0], -2.);
        assert_relative_eq!(ball.position[1], 6.15, epsilon = 1e-6);
        assert_eq!(ball.position[2], -30.);
        assert_eq!(ball.radius, 0.145);
        assert!(ball.visible);
    }
}
