//! Junctions, branches, endpoints and sections of a railway track.

use std::cmp::{max, min};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// The three ways a section can be connected to a junction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Branch {
    Facing,
    Normal,
    Reverse,
}

impl FromStr for Branch {
    type Err = &'static str;
    fn from_str(branch: &str) -> Result<Self, Self::Err> {
        match branch {
            "FACING" => Ok(Branch::Facing),
            "NORMAL" => Ok(Branch::Normal),
            "REVERSE" => Ok(Branch::Reverse),
            _ => Err("Could not parse branch type."),
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Branch::Facing => "FACING",
            Branch::Normal => "NORMAL",
            Branch::Reverse => "REVERSE",
        };
        write!(f, "{}", s)
    }
}

/// A named node in the track graph. Two junctions are the same junction
/// iff their names are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Junction {
    name: String,
}

impl Junction {
    pub fn new(name: impl Into<String>) -> Self {
        Junction { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Junction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// One end of a section: a junction together with the branch of that
/// junction the section is connected to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct JunctionBranch {
    pub junction: Junction,
    pub branch: Branch,
}

impl JunctionBranch {
    pub fn new(junction: Junction, branch: Branch) -> Self {
        JunctionBranch { junction, branch }
    }
}

impl fmt::Display for JunctionBranch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.junction, self.branch)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SectionError {
    #[error("length cannot be non-positive (got {0})")]
    InvalidLength(u64),
    #[error("end-points cannot be equivalent ({0})")]
    DuplicateEndpoint(JunctionBranch),
    #[error("end-points cannot be missing")]
    MissingEndpoint,
    #[error("{0} is not an end-point of the section")]
    UnknownEndpoint(JunctionBranch),
}

/// An immutable piece of track of positive length between two distinct
/// endpoints. The endpoints are unordered: a section equals its mirror
/// image.
#[derive(Debug, Clone)]
pub struct Section {
    length: u64,
    endpoints: [JunctionBranch; 2],
}

impl Section {
    pub fn new(length: u64, a: JunctionBranch, b: JunctionBranch) -> Result<Self, SectionError> {
        if length == 0 {
            return Err(SectionError::InvalidLength(length));
        }
        if a == b {
            return Err(SectionError::DuplicateEndpoint(a));
        }
        Ok(Section {
            length,
            endpoints: [a, b],
        })
    }

    /// Builds a section from endpoints that may not have been supplied,
    /// as happens when reading them from external input.
    pub fn from_parts(
        length: u64,
        a: Option<JunctionBranch>,
        b: Option<JunctionBranch>,
    ) -> Result<Self, SectionError> {
        match (a, b) {
            (Some(a), Some(b)) => Section::new(length, a, b),
            _ => Err(SectionError::MissingEndpoint),
        }
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn endpoints(&self) -> &[JunctionBranch; 2] {
        &self.endpoints
    }

    pub fn has_endpoint(&self, endpoint: &JunctionBranch) -> bool {
        self.endpoints.contains(endpoint)
    }

    pub fn other_endpoint(
        &self,
        endpoint: &JunctionBranch,
    ) -> Result<&JunctionBranch, SectionError> {
        if &self.endpoints[0] == endpoint {
            Ok(&self.endpoints[1])
        } else if &self.endpoints[1] == endpoint {
            Ok(&self.endpoints[0])
        } else {
            Err(SectionError::UnknownEndpoint(endpoint.clone()))
        }
    }

    /// Endpoints in a fixed order, independent of construction order.
    fn ordered_endpoints(&self) -> (&JunctionBranch, &JunctionBranch) {
        let [a, b] = &self.endpoints;
        (min(a, b), max(a, b))
    }
}

impl PartialEq for Section {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.ordered_endpoints() == other.ordered_endpoints()
    }
}

impl Eq for Section {}

impl Hash for Section {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        self.ordered_endpoints().hash(state);
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.length, self.endpoints[0], self.endpoints[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn ep(junction: &str, branch: Branch) -> JunctionBranch {
        JunctionBranch::new(Junction::new(junction), branch)
    }

    fn hash_of<T: Hash>(t: &T) -> u64 {
        let mut h = DefaultHasher::new();
        t.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_branch_parse_and_display() {
        for b in [Branch::Facing, Branch::Normal, Branch::Reverse].iter() {
            assert_eq!(b.to_string().parse::<Branch>(), Ok(*b));
        }
        assert!("facing".parse::<Branch>().is_err());
    }

    #[test]
    fn test_section_rejects_invalid() {
        let a = ep("j1", Branch::Facing);
        let b = ep("j2", Branch::Normal);
        assert_eq!(
            Section::new(0, a.clone(), b.clone()),
            Err(SectionError::InvalidLength(0))
        );
        assert_eq!(
            Section::new(5, a.clone(), a.clone()),
            Err(SectionError::DuplicateEndpoint(a.clone()))
        );
        assert_eq!(
            Section::from_parts(5, Some(a), None),
            Err(SectionError::MissingEndpoint)
        );
    }

    #[test]
    fn test_self_loop_allowed() {
        let s = Section::new(7, ep("j1", Branch::Normal), ep("j1", Branch::Reverse)).unwrap();
        assert_eq!(s.other_endpoint(&ep("j1", Branch::Normal)), Ok(&ep("j1", Branch::Reverse)));
    }

    #[test]
    fn test_other_endpoint() {
        let a = ep("j1", Branch::Facing);
        let b = ep("j2", Branch::Normal);
        let s = Section::new(10, a.clone(), b.clone()).unwrap();
        assert_eq!(s.other_endpoint(&a), Ok(&b));
        assert_eq!(s.other_endpoint(&b), Ok(&a));
        let c = ep("j3", Branch::Facing);
        assert_eq!(s.other_endpoint(&c), Err(SectionError::UnknownEndpoint(c)));
    }

    #[test]
    fn test_section_equality_is_unordered() {
        let a = ep("j1", Branch::Facing);
        let b = ep("j2", Branch::Normal);
        let s1 = Section::new(10, a.clone(), b.clone()).unwrap();
        let s2 = Section::new(10, b.clone(), a.clone()).unwrap();
        let s3 = Section::new(11, a, b).unwrap();
        assert_eq!(s1, s2);
        assert_eq!(hash_of(&s1), hash_of(&s2));
        assert_ne!(s1, s3);
    }

    #[test]
    fn test_section_display() {
        let s = Section::new(10, ep("j1", Branch::Facing), ep("j2", Branch::Normal)).unwrap();
        assert_eq!(s.to_string(), "10 j1 FACING j2 NORMAL");
    }
}
