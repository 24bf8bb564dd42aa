//! Points on the track.
//!
//! A location is written as an offset from one endpoint of a section, but
//! the same physical point usually has several such descriptions: a point
//! `k` from one end of a section of length `L` is `L - k` from the other
//! end, and a point at a junction (offset 0) lies on every section
//! connected to that junction, whatever branch it is described from.
//! Equality of [`Location`]s is this physical equivalence, not equality
//! of the fields.

use crate::topology::{Junction, JunctionBranch, Section};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("section cannot be missing")]
    NullSection,
    #[error("end-point cannot be missing")]
    NullEndpoint,
    #[error("offset {offset} is out of range for a section of length {length}")]
    OffsetOutOfRange { offset: u64, length: u64 },
    #[error("{0} is not an end-point of the given section")]
    EndpointNotOnSection(JunctionBranch),
}

/// Cloning a location shares its section.
#[derive(Debug, Clone)]
pub struct Location {
    section: Arc<Section>,
    /// Index of the endpoint in `section.endpoints()`.
    side: usize,
    offset: u64,
}

impl Location {
    /// The location `offset` from `endpoint` along `section`. The offset
    /// must be strictly less than the section length; the far end of the
    /// section is described from the other endpoint instead.
    pub fn new(
        section: impl Into<Arc<Section>>,
        endpoint: JunctionBranch,
        offset: u64,
    ) -> Result<Self, LocationError> {
        let section = section.into();
        if offset >= section.length() {
            return Err(LocationError::OffsetOutOfRange {
                offset,
                length: section.length(),
            });
        }
        let side = match section.endpoints().iter().position(|e| *e == endpoint) {
            Some(side) => side,
            None => return Err(LocationError::EndpointNotOnSection(endpoint)),
        };
        Ok(Location {
            section,
            side,
            offset,
        })
    }

    /// For callers that have already established the construction
    /// invariant.
    pub(crate) fn new_unchecked(section: Arc<Section>, side: usize, offset: u64) -> Self {
        debug_assert!(offset < section.length() && side < 2);
        Location {
            section,
            side,
            offset,
        }
    }

    /// Like [`Location::new`], for inputs where the section or endpoint
    /// may not have been found.
    pub fn from_parts(
        section: Option<Section>,
        endpoint: Option<JunctionBranch>,
        offset: u64,
    ) -> Result<Self, LocationError> {
        let section = section.ok_or(LocationError::NullSection)?;
        let endpoint = endpoint.ok_or(LocationError::NullEndpoint)?;
        Location::new(section, endpoint, offset)
    }

    pub fn section(&self) -> &Section {
        &self.section
    }

    pub fn endpoint(&self) -> &JunctionBranch {
        &self.section.endpoints()[self.side]
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn at_junction(&self) -> bool {
        self.offset == 0
    }

    /// A location at a junction lies on every section touching that
    /// junction; any other location lies only on its own section.
    pub fn on_section(&self, section: &Section) -> bool {
        if self.at_junction() {
            section
                .endpoints()
                .iter()
                .any(|e| e.junction == self.endpoint().junction)
        } else {
            *self.section == *section
        }
    }

    /// Whether the two locations describe the same physical point.
    pub fn equivalent(&self, other: &Location) -> bool {
        if self.offset == 0 && other.offset == 0 {
            return self.endpoint().junction == other.endpoint().junction;
        }
        if self.endpoint() == other.endpoint() {
            return self.offset == other.offset;
        }
        if self.section == other.section {
            return self.offset + other.offset == self.section.length();
        }
        false
    }

    /// The normal form of this point. A junction point is just its
    /// junction; any other point is described from the nearer end of its
    /// section, ties going to the smaller endpoint. All equivalent
    /// descriptions of a point on one track share the same normal form.
    pub fn canonical(&self) -> Canonical<'_> {
        let near = self.endpoint();
        if self.at_junction() {
            return Canonical::Junction(&near.junction);
        }
        let far = &self.section.endpoints()[1 - self.side];
        let far_offset = self.section.length() - self.offset;
        if self.offset < far_offset || (self.offset == far_offset && near <= far) {
            Canonical::Along(near, self.offset)
        } else {
            Canonical::Along(far, far_offset)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Canonical<'a> {
    Junction(&'a Junction),
    Along(&'a JunctionBranch, u64),
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.equivalent(other)
    }
}

impl Eq for Location {}

/// Hashes the junction of the canonical form, never its branch.
impl Hash for Location {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.canonical() {
            Canonical::Junction(junction) => junction.hash(state),
            Canonical::Along(endpoint, offset) => {
                endpoint.junction.hash(state);
                offset.hash(state);
            }
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let endpoint = self.endpoint();
        if self.at_junction() {
            write!(f, "{}", endpoint.junction)
        } else {
            write!(
                f,
                "Distance {} from {} along the {} branch",
                self.offset, endpoint.junction, endpoint.branch
            )
        }
    }
}
