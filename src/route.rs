//! Continuous paths over the track, made of segments.

use crate::location::Location;
use crate::segment::Segment;
use crate::track::Track;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("a route must contain at least one segment")]
    Empty,
    #[error("segment {index} does not start where the previous segment ends")]
    Discontinuous { index: usize },
    #[error("invalid sub-route {start}..{end} of a route of length {length}")]
    InvalidSubroute { start: u64, end: u64, length: u64 },
}

/// A non-empty sequence of segments where each segment starts at the
/// location the previous one ends at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    segments: Vec<Segment>,
}

impl Route {
    pub fn new(segments: Vec<Segment>) -> Result<Self, RouteError> {
        if segments.is_empty() {
            return Err(RouteError::Empty);
        }
        for (index, pair) in segments.windows(2).enumerate() {
            if pair[0].last_location() != pair[1].first_location() {
                return Err(RouteError::Discontinuous { index: index + 1 });
            }
        }
        Ok(Route { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    pub fn length(&self) -> u64 {
        self.segments.iter().map(|s| s.length()).sum()
    }

    /// All locations on the route. Consecutive segments share their
    /// boundary location, which is therefore listed twice.
    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        self.segments.iter().flat_map(|s| s.locations())
    }

    pub fn intersects(&self, other: &Route) -> bool {
        let ours = self.locations().collect::<HashSet<_>>();
        other.locations().any(|l| ours.contains(&l))
    }

    pub fn on_track(&self, track: &Track) -> bool {
        self.segments.iter().all(|s| track.contains(s.section()))
    }

    /// The part of the route between distances `start` and `end` from its
    /// beginning.
    pub fn subroute(&self, start: u64, end: u64) -> Result<Route, RouteError> {
        let length = self.length();
        if start >= end || end > length {
            return Err(RouteError::InvalidSubroute { start, end, length });
        }

        let mut segments = Vec::new();
        let mut distance = 0;
        for segment in self.segments.iter() {
            let (seg_start, seg_end) = (distance, distance + segment.length());
            distance = seg_end;

            let from = start.max(seg_start);
            let to = end.min(seg_end);
            if from >= to {
                continue;
            }
            let piece = segment
                .with_offsets(
                    segment.start_offset() + (from - seg_start),
                    segment.start_offset() + (to - seg_start),
                )
                .map_err(|_| RouteError::InvalidSubroute { start, end, length })?;
            segments.push(piece);
        }
        Route::new(segments)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let lines = self.segments.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        write!(f, "{}", lines.join("\n"))
    }
}
