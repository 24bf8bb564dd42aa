//! A track together with the trains running on it.

use crate::allocator;
use crate::route::{Route, RouteError};
use crate::segment::Segment;
use crate::track::Track;
use log::*;
use thiserror::Error;

pub type TrainId = usize;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RailwayError {
    #[error("the route is not on the railway's track")]
    RouteNotOnTrack,
    #[error(transparent)]
    InvalidOffsets(#[from] RouteError),
    #[error("the sub-route intersects the allocation of train {0}")]
    Intersects(TrainId),
    #[error("no train with identifier {0}")]
    UnknownTrain(TrainId),
    #[error("expected a request for each of the {expected} trains, got {got}")]
    RequestCount { expected: usize, got: usize },
}

/// A train following a route, currently allocated the part of the route
/// between `start` and `end`.
#[derive(Debug, Clone)]
pub struct Train {
    id: TrainId,
    route: Route,
    start: u64,
    end: u64,
    allocation: Route,
}

impl Train {
    pub fn id(&self) -> TrainId {
        self.id
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn start_offset(&self) -> u64 {
        self.start
    }

    pub fn end_offset(&self) -> u64 {
        self.end
    }

    pub fn allocation(&self) -> &Route {
        &self.allocation
    }
}

#[derive(Debug)]
pub struct Railway {
    track: Track,
    trains: Vec<Train>,
}

impl Railway {
    pub fn new(track: Track) -> Self {
        Railway {
            track,
            trains: Vec::new(),
        }
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    pub fn train(&self, id: TrainId) -> Option<&Train> {
        self.trains.get(id)
    }

    /// Adds a train following `route` with the allocation `start..end`
    /// along it. Identifiers are handed out in order from 0.
    pub fn add_train(
        &mut self,
        route: Route,
        start: u64,
        end: u64,
    ) -> Result<TrainId, RailwayError> {
        if !route.on_track(&self.track) {
            return Err(RailwayError::RouteNotOnTrack);
        }
        let id = self.trains.len();
        let allocation = self.checked_allocation(id, &route, start, end)?;
        info!("Added train {} with allocation {}..{}", id, start, end);
        self.trains.push(Train {
            id,
            route,
            start,
            end,
            allocation,
        });
        Ok(id)
    }

    pub fn update_allocation(
        &mut self,
        id: TrainId,
        start: u64,
        end: u64,
    ) -> Result<(), RailwayError> {
        let train = self.trains.get(id).ok_or(RailwayError::UnknownTrain(id))?;
        if train.start == start && train.end == end {
            debug!("Train {} allocation unchanged", id);
            return Ok(());
        }
        let allocation = self.checked_allocation(id, &train.route, start, end)?;
        let train = &mut self.trains[id];
        train.start = start;
        train.end = end;
        train.allocation = allocation;
        info!("Train {} allocation updated to {}..{}", id, start, end);
        Ok(())
    }

    /// Runs the allocator with every train occupying its current
    /// allocation and requesting `requests[id]` along its route. Lower
    /// identifiers take priority. The railway itself is not changed.
    pub fn request(&self, requests: &[(u64, u64)]) -> Result<Vec<Vec<Segment>>, RailwayError> {
        if requests.len() != self.trains.len() {
            return Err(RailwayError::RequestCount {
                expected: self.trains.len(),
                got: requests.len(),
            });
        }
        let occupied = self
            .trains
            .iter()
            .map(|t| t.allocation.segments().to_vec())
            .collect::<Vec<_>>();
        let requested = self
            .trains
            .iter()
            .zip(requests.iter())
            .map(|(t, (start, end))| -> Result<Vec<Segment>, RailwayError> {
                Ok(t.route.subroute(*start, *end)?.into_segments())
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(allocator::allocate(&occupied, &requested))
    }

    fn checked_allocation(
        &self,
        id: TrainId,
        route: &Route,
        start: u64,
        end: u64,
    ) -> Result<Route, RailwayError> {
        let allocation = route.subroute(start, end)?;
        if let Some(other) = self
            .trains
            .iter()
            .find(|t| t.id != id && t.allocation.intersects(&allocation))
        {
            return Err(RailwayError::Intersects(other.id));
        }
        Ok(allocation)
    }
}
