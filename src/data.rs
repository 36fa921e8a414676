//! Pitch data ingest.
//!
//! Two JSON layouts are accepted:
//!
//! * nested: `{ team: { pitcher: { pitch_type: record | [record] } } }`
//! * flat: `[record]`, where each record may carry `team` and `pitcher`.
//!
//! Records are converted into the model frame (x lateral, y height, z
//! downrange) and validated. Incomplete records are rejected, never simulated.

use crate::error::{PitchError, Result};
use crate::pitch::{PitchTrajectory, PitchType};
use log::{info, warn};
use nalgebra::Vector3;
use rayon::prelude::*;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

const UNKNOWN_GROUP: &str = "unknown";

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Downrange coordinate assigned to every release point, feet.
    pub release_downrange: f64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            release_downrange: -2.03,
        }
    }
}

/// One pitch as stored in the data file. Every number is optional here so a
/// missing coefficient becomes a rejected record instead of a parse failure.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PitchRecord {
    #[serde(default)]
    pub pitch_type: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default, alias = "player_name")]
    pub pitcher: Option<String>,
    #[serde(default)]
    pub release_pos_x: Option<f64>,
    #[serde(default)]
    pub release_pos_z: Option<f64>,
    #[serde(default)]
    pub vx0: Option<f64>,
    #[serde(default)]
    pub vy0: Option<f64>,
    #[serde(default)]
    pub vz0: Option<f64>,
    #[serde(default)]
    pub ax: Option<f64>,
    #[serde(default)]
    pub ay: Option<f64>,
    #[serde(default)]
    pub az: Option<f64>,
}

impl PitchRecord {
    /// Builds a trajectory in the model frame.
    pub fn to_trajectory(
        &self,
        pitch_type: PitchType,
        config: &IngestConfig,
    ) -> Result<PitchTrajectory> {
        let field = |name: &str, value: Option<f64>| {
            value.ok_or_else(|| PitchError::InvalidTrajectory {
                pitch_type: pitch_type.to_string(),
                reason: format!("missing {}", name),
            })
        };
        let release = Vector3::new(
            -field("release_pos_x", self.release_pos_x)?,
            field("release_pos_z", self.release_pos_z)?,
            config.release_downrange,
        );
        let velocity = Vector3::new(
            -field("vx0", self.vx0)?,
            field("vz0", self.vz0)?,
            field("vy0", self.vy0)?,
        );
        let acceleration = Vector3::new(
            -field("ax", self.ax)?,
            field("az", self.az)?,
            field("ay", self.ay)?,
        );
        PitchTrajectory::new(pitch_type, release, velocity, acceleration)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordOrList {
    List(Vec<PitchRecord>),
    Single(PitchRecord),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawData {
    Flat(Vec<PitchRecord>),
    Nested(BTreeMap<String, BTreeMap<String, BTreeMap<String, RecordOrList>>>),
}

struct KeyedRecord {
    team: String,
    pitcher: String,
    pitch_type: Option<String>,
    record: PitchRecord,
}

/// Records with their group keys, plus every team and pitcher the file
/// declares, including the ones without any pitches.
fn flatten(raw: RawData) -> (Vec<KeyedRecord>, Vec<(String, Vec<String>)>) {
    match raw {
        RawData::Flat(records) => {
            let keyed = records
                .into_iter()
                .map(|record| KeyedRecord {
                    team: record
                        .team
                        .clone()
                        .unwrap_or_else(|| UNKNOWN_GROUP.to_string()),
                    pitcher: record
                        .pitcher
                        .clone()
                        .unwrap_or_else(|| UNKNOWN_GROUP.to_string()),
                    pitch_type: record.pitch_type.clone(),
                    record,
                })
                .collect();
            (keyed, Vec::new())
        }
        RawData::Nested(teams) => {
            let mut keyed = Vec::new();
            let mut declared = Vec::new();
            for (team, pitchers) in teams {
                declared.push((team.clone(), pitchers.keys().cloned().collect()));
                for (pitcher, types) in pitchers {
                    for (pitch_type, entry) in types {
                        let records = match entry {
                            RecordOrList::List(records) => records,
                            RecordOrList::Single(record) => vec![record],
                        };
                        keyed.extend(records.into_iter().map(|record| KeyedRecord {
                            team: team.clone(),
                            pitcher: pitcher.clone(),
                            pitch_type: Some(pitch_type.clone()),
                            record,
                        }));
                    }
                }
            }
            (keyed, declared)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RejectedRecord {
    pub team: String,
    pub pitcher: String,
    pub reason: String,
}

/// Validated trajectories grouped by team and pitcher, in sorted order.
#[derive(Clone, Debug, Default)]
pub struct PitchCatalog {
    groups: BTreeMap<String, BTreeMap<String, Vec<Arc<PitchTrajectory>>>>,
    rejected: Vec<RejectedRecord>,
}

impl PitchCatalog {
    pub fn from_json_str(json: &str, config: &IngestConfig) -> Result<PitchCatalog> {
        let raw: RawData = serde_json::from_str(json).map_err(|err| {
            PitchError::DataLoad(format!("unrecognised pitch data layout: {}", err))
        })?;
        let (keyed, declared) = flatten(raw);
        let mut catalog = Self::from_keyed(keyed, config);
        for (team, pitchers) in declared {
            let group = catalog.groups.entry(team).or_default();
            for pitcher in pitchers {
                group.entry(pitcher).or_default();
            }
        }
        Ok(catalog)
    }

    pub fn load<P: AsRef<Path>>(path: P, config: &IngestConfig) -> Result<PitchCatalog> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|err| {
            PitchError::DataLoad(format!("cannot read {}: {}", path.display(), err))
        })?;
        let catalog = Self::from_json_str(&json, config)?;
        info!(
            "Loaded {} pitches from {} ({} rejected)",
            catalog.len(),
            path.display(),
            catalog.rejected.len()
        );
        Ok(catalog)
    }

    pub fn from_trajectories<I>(team: &str, pitcher: &str, trajectories: I) -> PitchCatalog
    where
        I: IntoIterator<Item = PitchTrajectory>,
    {
        let mut catalog = PitchCatalog::default();
        catalog.insert(team, pitcher, trajectories);
        catalog
    }

    pub fn insert<I>(&mut self, team: &str, pitcher: &str, trajectories: I)
    where
        I: IntoIterator<Item = PitchTrajectory>,
    {
        self.groups
            .entry(team.to_string())
            .or_default()
            .entry(pitcher.to_string())
            .or_default()
            .extend(trajectories.into_iter().map(Arc::new));
    }

    fn from_keyed(keyed: Vec<KeyedRecord>, config: &IngestConfig) -> PitchCatalog {
        let converted: Vec<(String, String, Result<PitchTrajectory>)> = keyed
            .into_par_iter()
            .map(|keyed| {
                let trajectory = match keyed.pitch_type {
                    Some(code) => keyed.record.to_trajectory(PitchType::new(code), config),
                    None => Err(PitchError::InvalidTrajectory {
                        pitch_type: String::new(),
                        reason: "missing pitch_type".to_string(),
                    }),
                };
                (keyed.team, keyed.pitcher, trajectory)
            })
            .collect();

        let mut catalog = PitchCatalog::default();
        for (team, pitcher, trajectory) in converted {
            match trajectory {
                Ok(trajectory) => catalog.insert(&team, &pitcher, Some(trajectory)),
                Err(err) => {
                    warn!("Skipping pitch of {} / {}: {}", team, pitcher, err);
                    catalog.rejected.push(RejectedRecord {
                        team,
                        pitcher,
                        reason: err.to_string(),
                    });
                }
            }
        }
        catalog
    }

    pub fn teams(&self) -> Vec<String> {
        self.groups.keys().cloned().collect()
    }

    pub fn pitchers(&self, team: &str) -> Vec<String> {
        self.groups
            .get(team)
            .map(|pitchers| pitchers.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn trajectories(&self, team: &str, pitcher: &str) -> Option<&[Arc<PitchTrajectory>]> {
        self.groups
            .get(team)
            .and_then(|pitchers| pitchers.get(pitcher))
            .map(|trajectories| trajectories.as_slice())
    }

    /// Distinct pitch types thrown by a pitcher, sorted.
    pub fn pitch_types(&self, team: &str, pitcher: &str) -> Vec<PitchType> {
        let mut types: Vec<PitchType> = self
            .trajectories(team, pitcher)
            .unwrap_or(&[])
            .iter()
            .map(|trajectory| trajectory.pitch_type().clone())
            .collect();
        types.sort();
        types.dedup();
        types
    }

    pub fn rejected(&self) -> &[RejectedRecord] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.groups
            .values()
            .flat_map(|pitchers| pitchers.values())
            .map(|trajectories| trajectories.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NESTED: &str = r#"{
        "NYY": {
            "Cole, Gerrit": {
                "FF": {"release_pos_x": -1.8, "release_pos_z": 6.0,
                       "vx0": 5.1, "vy0": -139.0, "vz0": -6.2,
                       "ax": -11.0, "ay": 31.0, "az": -12.5},
                "SL": [
                    {"release_pos_x": -1.9, "release_pos_z": 5.9,
                     "vx0": 2.0, "vy0": -125.0, "vz0": -3.0,
                     "ax": 4.0, "ay": 25.0, "az": -35.0},
                    {"release_pos_x": -1.9, "release_pos_z": 5.9,
                     "vx0": 2.0, "vy0": -125.0, "vz0": -3.0,
                     "ax": 4.0, "ay": 25.0}
                ]
            }
        },
        "BOS": {
            "Sale, Chris": {
                "CH": {"release_pos_x": 2.0, "release_pos_z": 5.5,
                       "vx0": -4.0, "vy0": -125.0, "vz0": -2.0,
                       "ax": 12.0, "ay": 26.0, "az": -25.0}
            },
            "Houck, Tanner": {}
        }
    }"#;

    const FLAT: &str = r#"[
        {"pitch_type": "FF", "team": "LAD", "player_name": "Buehler, Walker",
         "release_pos_x": -1.5, "release_pos_z": 6.1, "vx0": 4.0, "vy0": -140.0,
         "vz0": -7.0, "ax": -10.0, "ay": 30.0, "az": -14.0},
        {"pitch_type": "CU", "release_pos_x": -1.5, "release_pos_z": 6.2,
         "vx0": 1.0, "vy0": -115.0, "vz0": 2.0, "ax": 5.0, "ay": 22.0, "az": -45.0},
        {"team": "LAD", "pitcher": "Buehler, Walker", "release_pos_x": -1.5,
         "release_pos_z": 6.1, "vx0": 4.0, "vy0": -140.0, "vz0": -7.0,
         "ax": -10.0, "ay": 30.0, "az": -14.0}
    ]"#;

    #[test]
    fn reads_nested_layout() {
        let catalog = PitchCatalog::from_json_str(NESTED, &IngestConfig::default()).unwrap();
        assert_eq!(catalog.teams(), vec!["BOS".to_string(), "NYY".to_string()]);
        // Pitchers without any pitches are still listed.
        assert_eq!(
            catalog.pitchers("BOS"),
            vec!["Houck, Tanner".to_string(), "Sale, Chris".to_string()]
        );
        assert_eq!(catalog.trajectories("BOS", "Houck, Tanner").map(|t| t.len()), Some(0));
        assert!(catalog.pitch_types("BOS", "Houck, Tanner").is_empty());
        assert_eq!(
            catalog.pitch_types("NYY", "Cole, Gerrit"),
            vec![PitchType::from("FF"), PitchType::from("SL")]
        );
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.rejected().len(), 1);
        assert!(catalog.rejected()[0].reason.contains("az"));
    }

    #[test]
    fn reads_flat_layout() {
        let catalog = PitchCatalog::from_json_str(FLAT, &IngestConfig::default()).unwrap();
        assert_eq!(catalog.teams(), vec!["LAD".to_string(), "unknown".to_string()]);
        assert_eq!(catalog.trajectories("LAD", "Buehler, Walker").unwrap().len(), 1);
        assert_eq!(catalog.trajectories("unknown", "unknown").unwrap().len(), 1);
        assert_eq!(catalog.rejected().len(), 1);
        assert!(catalog.rejected()[0].reason.contains("pitch_type"));
    }

    #[test]
    fn maps_record_into_model_frame() {
        let catalog = PitchCatalog::from_json_str(NESTED, &IngestConfig::default()).unwrap();
        let sale = catalog.trajectories("BOS", "Sale, Chris").unwrap();
        let trajectory = &sale[0];
        assert_eq!(*trajectory.release(), Vector3::new(-2.0, 5.5, -2.03));
        assert_eq!(*trajectory.velocity(), Vector3::new(4.0, -2.0, -125.0));
        assert_eq!(*trajectory.acceleration(), Vector3::new(-12.0, -25.0, 26.0));
    }

    #[test]
    fn unrecognised_layout_is_a_load_failure() {
        let result = PitchCatalog::from_json_str("{\"NYY\": 3}", &IngestConfig::default());
        assert!(matches!(result, Err(PitchError::DataLoad(_))));
        let result = PitchCatalog::load("/nonexistent/pitch_data.json", &IngestConfig::default());
        assert!(matches!(result, Err(PitchError::DataLoad(_))));
    }
}
