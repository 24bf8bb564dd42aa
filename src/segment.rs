//! Directed pieces of a single section, the unit of route allocation.

use crate::location::{Location, LocationError};
use crate::topology::{JunctionBranch, Section};
use std::collections::HashSet;
use std::fmt;
use std::iter::once;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SegmentError {
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error("invalid offsets {start}..{end} for a section of length {length}")]
    InvalidOffsets { start: u64, end: u64, length: u64 },
}

/// The part of `section` from `start` to `end` (inclusive) measured from
/// `departing`, travelled away from `departing`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    section: Arc<Section>,
    departing: JunctionBranch,
    start: u64,
    end: u64,
}

impl Segment {
    pub fn new(
        section: impl Into<Arc<Section>>,
        departing: JunctionBranch,
        start: u64,
        end: u64,
    ) -> Result<Self, SegmentError> {
        let section = section.into();
        if !section.has_endpoint(&departing) {
            return Err(LocationError::EndpointNotOnSection(departing).into());
        }
        if start >= end || end > section.length() {
            return Err(SegmentError::InvalidOffsets {
                start,
                end,
                length: section.length(),
            });
        }
        Ok(Segment {
            section,
            departing,
            start,
            end,
        })
    }

    /// Like [`Segment::new`], for inputs where the section or endpoint may
    /// not have been found.
    pub fn from_parts(
        section: Option<Section>,
        departing: Option<JunctionBranch>,
        start: u64,
        end: u64,
    ) -> Result<Self, SegmentError> {
        let section = section.ok_or(LocationError::NullSection)?;
        let departing = departing.ok_or(LocationError::NullEndpoint)?;
        Segment::new(section, departing, start, end)
    }

    /// The same directed piece of section with other offsets.
    pub fn with_offsets(&self, start: u64, end: u64) -> Result<Segment, SegmentError> {
        Segment::new(Arc::clone(&self.section), self.departing.clone(), start, end)
    }

    pub fn section(&self) -> &Section {
        &self.section
    }

    pub fn departing_endpoint(&self) -> &JunctionBranch {
        &self.departing
    }

    pub fn start_offset(&self) -> u64 {
        self.start
    }

    pub fn end_offset(&self) -> u64 {
        self.end
    }

    pub fn length(&self) -> u64 {
        self.end - self.start
    }

    /// The endpoint the segment travels towards.
    pub fn arriving_endpoint(&self) -> &JunctionBranch {
        // Checked on construction.
        self.section
            .other_endpoint(&self.departing)
            .unwrap_or(&self.departing)
    }

    /// Index of the departing endpoint in `section.endpoints()`.
    fn side(&self) -> usize {
        if self.section.endpoints()[0] == self.departing {
            0
        } else {
            1
        }
    }

    pub fn first_location(&self) -> Location {
        Location::new_unchecked(Arc::clone(&self.section), self.side(), self.start)
    }

    /// The location at `end`. A segment running to the far end of its
    /// section ends at the junction there.
    pub fn last_location(&self) -> Location {
        if self.end < self.section.length() {
            Location::new_unchecked(Arc::clone(&self.section), self.side(), self.end)
        } else {
            Location::new_unchecked(Arc::clone(&self.section), 1 - self.side(), 0)
        }
    }

    /// The `end - start + 1` distinct locations of the segment, in the
    /// direction of travel.
    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        let side = self.side();
        (self.start..self.end)
            .map(move |offset| Location::new_unchecked(Arc::clone(&self.section), side, offset))
            .chain(once(self.last_location()))
    }

    pub fn intersects(&self, other: &Segment) -> bool {
        let ours = self.locations().collect::<HashSet<_>>();
        other.locations().any(|l| ours.contains(&l))
    }

    pub fn intersects_any(&self, locations: &HashSet<Location>) -> bool {
        self.locations().any(|l| locations.contains(&l))
    }

    /// The longest prefix of this segment that contains none of the
    /// `forbidden` locations: the segment cut just before its first
    /// forbidden location. `None` if fewer than two locations remain.
    pub fn longest_valid_prefix(&self, forbidden: &HashSet<Location>) -> Option<Segment> {
        let first_forbidden = match self.locations().position(|l| forbidden.contains(&l)) {
            Some(i) => i as u64,
            None => return Some(self.clone()),
        };
        if first_forbidden < 2 {
            return None;
        }
        Some(Segment {
            end: self.start + first_forbidden - 1,
            ..self.clone()
        })
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}..{} from {} along the {} branch",
            self.start, self.end, self.departing.junction, self.departing.branch
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{Branch, Junction};

    fn ep(junction: &str, branch: Branch) -> JunctionBranch {
        JunctionBranch::new(Junction::new(junction), branch)
    }

    fn section() -> Section {
        Section::new(10, ep("j1", Branch::Facing), ep("j2", Branch::Normal)).unwrap()
    }

    fn seg(start: u64, end: u64) -> Segment {
        Segment::new(section(), ep("j1", Branch::Facing), start, end).unwrap()
    }

    fn locations(
        departing: &JunctionBranch,
        offsets: impl IntoIterator<Item = u64>,
    ) -> HashSet<Location> {
        offsets
            .into_iter()
            .map(|o| Location::new(section(), departing.clone(), o).unwrap())
            .collect()
    }

    #[test]
    fn test_construction_errors() {
        assert_eq!(
            Segment::new(section(), ep("j1", Branch::Facing), 4, 4).unwrap_err(),
            SegmentError::InvalidOffsets { start: 4, end: 4, length: 10 }
        );
        assert_eq!(
            Segment::new(section(), ep("j1", Branch::Facing), 4, 11).unwrap_err(),
            SegmentError::InvalidOffsets { start: 4, end: 11, length: 10 }
        );
        assert_eq!(
            Segment::new(section(), ep("j3", Branch::Facing), 1, 2).unwrap_err(),
            SegmentError::Location(LocationError::EndpointNotOnSection(ep("j3", Branch::Facing)))
        );
        assert_eq!(
            Segment::from_parts(None, Some(ep("j1", Branch::Facing)), 1, 2).unwrap_err(),
            SegmentError::Location(LocationError::NullSection)
        );
        assert!(Segment::new(section(), ep("j1", Branch::Facing), 0, 10).is_ok());
    }

    #[test]
    fn test_with_offsets() {
        assert_eq!(seg(2, 7).with_offsets(3, 10), Ok(seg(3, 10)));
        assert_eq!(
            seg(2, 7).with_offsets(3, 11),
            Err(SegmentError::InvalidOffsets { start: 3, end: 11, length: 10 })
        );
    }

    #[test]
    fn test_locations() {
        let s = seg(2, 5);
        let offsets = s.locations().map(|l| l.offset()).collect::<Vec<_>>();
        assert_eq!(offsets, vec![2, 3, 4, 5]);

        // Running to the end of the section finishes at the far junction.
        let s = seg(8, 10);
        let last = s.last_location();
        assert_eq!(last.endpoint(), &ep("j2", Branch::Normal));
        assert_eq!(last.offset(), 0);
        assert_eq!(s.locations().count(), 3);
    }

    #[test]
    fn test_locations_share_section() {
        let s = seg(8, 10);
        let locations = s.locations().collect::<Vec<_>>();
        let copies = locations.clone();
        for l in locations.iter().chain(copies.iter()) {
            assert!(std::ptr::eq(l.section(), s.section()));
        }
        let shorter = s.with_offsets(8, 9).unwrap();
        assert!(std::ptr::eq(shorter.first_location().section(), s.section()));
    }

    #[test]
    fn test_intersects_in_both_directions() {
        let forward = seg(1, 3);
        let backward = Segment::new(section(), ep("j2", Branch::Normal), 7, 9).unwrap();
        // Backward 7..9 covers offsets 3..1 from j1.
        assert!(forward.intersects(&backward));
        let backward = Segment::new(section(), ep("j2", Branch::Normal), 0, 6).unwrap();
        assert!(!forward.intersects(&backward));
        // Touching at offset 4 from j1 is an intersection.
        let backward = Segment::new(section(), ep("j2", Branch::Normal), 0, 7).unwrap();
        assert!(seg(4, 5).intersects(&backward));
    }

    #[test]
    fn test_longest_valid_prefix() {
        let j1 = ep("j1", Branch::Facing);
        let j2 = ep("j2", Branch::Normal);

        // Cut just before offset 6.
        let cut = seg(2, 7).longest_valid_prefix(&locations(&j1, 6..10));
        assert_eq!(cut, Some(seg(2, 5)));
        // Same forbidden points described from the other end.
        let cut = seg(2, 7).longest_valid_prefix(&locations(&j2, 1..5));
        assert_eq!(cut, Some(seg(2, 5)));
        // First location forbidden.
        assert_eq!(seg(2, 7).longest_valid_prefix(&locations(&j1, 2..3)), None);
        // Only the first location free: no segment of positive length.
        assert_eq!(seg(2, 7).longest_valid_prefix(&locations(&j1, 3..4)), None);
        let cut = seg(2, 7).longest_valid_prefix(&locations(&j1, 4..5));
        assert_eq!(cut, Some(seg(2, 3)));
        // Nothing forbidden.
        let cut = seg(2, 7).longest_valid_prefix(&HashSet::new());
        assert_eq!(cut, Some(seg(2, 7)));
    }

    #[test]
    fn test_prefix_blocked_at_far_junction() {
        // The far junction is forbidden through another section.
        let other = Section::new(4, ep("j2", Branch::Facing), ep("j3", Branch::Normal)).unwrap();
        let forbidden = vec![Location::new(other, ep("j2", Branch::Facing), 0).unwrap()]
            .into_iter()
            .collect::<HashSet<_>>();
        assert!(seg(5, 10).intersects_any(&forbidden));
        assert_eq!(seg(5, 10).longest_valid_prefix(&forbidden), Some(seg(5, 9)));
    }
}
