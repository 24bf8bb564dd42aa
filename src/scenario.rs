//! JSON description of trains' occupied and requested segments.
//!
//! ```json
//! { "trains": [
//!     { "name": "t0",
//!       "occupied": [ { "junction": "j0", "branch": "NORMAL", "start": 0, "end": 3 } ],
//!       "requested": [ { "junction": "j0", "branch": "NORMAL", "start": 2, "end": 7 } ] } ] }
//! ```
//!
//! A segment is addressed by its departing endpoint; its section is the
//! section of the track connected there.

use crate::segment::{Segment, SegmentError};
use crate::topology::{Branch, Junction, JunctionBranch};
use crate::track::Track;
use log::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Cannot read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid scenario: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Train {train}, {list} segment {index}: {source}")]
    Segment {
        train: String,
        list: &'static str,
        index: usize,
        #[source]
        source: SegmentError,
    },
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Scenario {
    pub trains: Vec<TrainRequest>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct TrainRequest {
    pub name: String,
    pub occupied: Vec<SegmentRef>,
    pub requested: Vec<SegmentRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct SegmentRef {
    pub junction: Junction,
    pub branch: Branch,
    pub start: u64,
    pub end: u64,
}

impl SegmentRef {
    pub fn resolve(&self, track: &Track) -> Result<Segment, SegmentError> {
        let section = track.section_at(&self.junction, self.branch).cloned();
        let departing = JunctionBranch::new(self.junction.clone(), self.branch);
        Segment::from_parts(section, Some(departing), self.start, self.end)
    }
}

impl From<&Segment> for SegmentRef {
    fn from(segment: &Segment) -> Self {
        let departing = segment.departing_endpoint();
        SegmentRef {
            junction: departing.junction.clone(),
            branch: departing.branch,
            start: segment.start_offset(),
            end: segment.end_offset(),
        }
    }
}

/// Index-aligned allocator inputs.
#[derive(Debug)]
pub struct Trains {
    pub names: Vec<String>,
    pub occupied: Vec<Vec<Segment>>,
    pub requested: Vec<Vec<Segment>>,
}

impl Scenario {
    pub fn from_json(contents: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn read(path: &Path) -> Result<Self, ScenarioError> {
        trace!("Loading scenario file {}", path.display());
        let contents = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Scenario::from_json(&contents)
    }

    pub fn resolve(&self, track: &Track) -> Result<Trains, ScenarioError> {
        let mut trains = Trains {
            names: Vec::new(),
            occupied: Vec::new(),
            requested: Vec::new(),
        };
        for train in self.trains.iter() {
            trace!(
                "Converting train {} with {} occupied and {} requested segments",
                train.name,
                train.occupied.len(),
                train.requested.len()
            );
            if train.occupied.is_empty() {
                warn!("Train {} does not occupy any track", train.name);
            }
            trains.occupied.push(resolve_list(track, &train.name, "occupied", &train.occupied)?);
            trains.requested.push(resolve_list(track, &train.name, "requested", &train.requested)?);
            trains.names.push(train.name.clone());
        }
        Ok(trains)
    }
}

fn resolve_list(
    track: &Track,
    train: &str,
    list: &'static str,
    segments: &[SegmentRef],
) -> Result<Vec<Segment>, ScenarioError> {
    segments
        .iter()
        .enumerate()
        .map(|(index, s)| {
            s.resolve(track).map_err(|source| ScenarioError::Segment {
                train: train.to_string(),
                list,
                index,
                source,
            })
        })
        .collect()
}
