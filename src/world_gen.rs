use crate::data::{IngestConfig, PitchCatalog, PitchRecord};
use crate::pitch::PitchType;
use log::warn;
use rand::Rng;
use rand_pcg::Pcg64;

pub struct GenerationConfig {
    pub teams: usize,
    pub pitchers_per_team: usize,
    pub pitches_per_type: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            teams: 2,
            pitchers_per_team: 3,
            pitches_per_type: 1,
        }
    }
}

// (code, vy0, ax, ay, az) for a right-handed pitcher, record frame.
const ARCHETYPES: [(&str, f64, f64, f64, f64); 6] = [
    ("FF", -138., -12., 30., -14.),
    ("SI", -134., -17., 29., -20.),
    ("SL", -123., 5., 24., -31.),
    ("CU", -113., 7., 21., -42.),
    ("CH", -124., -15., 25., -24.),
    ("FC", -128., 2., 27., -24.),
];

/// Builds a catalog of plausible synthetic pitches. Deterministic for a given config.
pub fn generate_catalog(config: &GenerationConfig, ingest: &IngestConfig) -> PitchCatalog {
    let mut rng = Pcg64::new(0xcafef00dd15ea5e5, 0xa02bdbf7bb3c0a7ac28fa16a64abf96);
    let mut catalog = PitchCatalog::default();

    for team in 0..config.teams {
        let team_name = format!("Team {}", team + 1);
        for pitcher in 0..config.pitchers_per_team {
            let pitcher_name = format!("Pitcher {}-{}", team + 1, pitcher + 1);
            let arm_side = if rng.gen_bool(0.7) { 1. } else { -1. };
            let release_x = arm_side * rng.gen_range(1.2..2.6);
            let release_z = rng.gen_range(5.2..6.6);
            let n_types = rng.gen_range(3..=ARCHETYPES.len());

            let mut trajectories = Vec::new();
            for &(code, vy0, ax, ay, az) in ARCHETYPES.iter().take(n_types) {
                for _ in 0..config.pitches_per_type {
                    let record = PitchRecord {
                        pitch_type: Some(code.to_string()),
                        release_pos_x: Some(release_x + rng.gen_range(-0.1..0.1)),
                        release_pos_z: Some(release_z + rng.gen_range(-0.1..0.1)),
                        vx0: Some(-arm_side * rng.gen_range(2.0..7.0)),
                        vy0: Some(vy0 * rng.gen_range(0.97..1.03)),
                        vz0: Some(rng.gen_range(-8.0..-2.0)),
                        ax: Some(arm_side * ax * rng.gen_range(0.8..1.2)),
                        ay: Some(ay * rng.gen_range(0.9..1.1)),
                        az: Some(az * rng.gen_range(0.9..1.1)),
                        ..PitchRecord::default()
                    };
                    match record.to_trajectory(PitchType::from(code), ingest) {
                        Ok(trajectory) => trajectories.push(trajectory),
                        Err(err) => warn!("Dropping generated pitch: {}", err),
                    }
                }
            }
            catalog.insert(&team_name, &pitcher_name, trajectories);
        }
    }
    catalog
}
