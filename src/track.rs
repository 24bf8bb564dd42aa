//! A railway track as a set of sections, at most one per endpoint.

use crate::topology::{Branch, Junction, JunctionBranch, Section};
use log::*;
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackError {
    #[error(
        "The track already contains a section that is connected to the end-point {endpoint} \
         of the given section."
    )]
    EndpointInUse { endpoint: JunctionBranch },
}

/// Sections are stored in an arena; `endpoints` maps every connected
/// endpoint to the index of its section.
#[derive(Debug, Clone, Default)]
pub struct Track {
    sections: Vec<Section>,
    endpoints: HashMap<JunctionBranch, usize>,
}

impl Track {
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds a section to the track. Adding a section that is already on the
    /// track does nothing. A section sharing an endpoint with another
    /// section is rejected and the track is left unchanged.
    pub fn add_section(&mut self, section: Section) -> Result<(), TrackError> {
        if self.contains(&section) {
            trace!("Section {} already on track", section);
            return Ok(());
        }
        for endpoint in section.endpoints().iter() {
            if self.endpoints.contains_key(endpoint) {
                return Err(TrackError::EndpointInUse {
                    endpoint: endpoint.clone(),
                });
            }
        }

        let idx = self.sections.len();
        for endpoint in section.endpoints().iter() {
            self.endpoints.insert(endpoint.clone(), idx);
        }
        self.sections.push(section);
        Ok(())
    }

    /// Removes the section if it is on the track.
    pub fn remove_section(&mut self, section: &Section) {
        let idx = match self.index_of(section) {
            Some(idx) => idx,
            None => return,
        };

        let removed = self.sections.swap_remove(idx);
        for endpoint in removed.endpoints().iter() {
            self.endpoints.remove(endpoint);
        }
        // The last section was moved into the hole.
        if let Some(moved) = self.sections.get(idx) {
            for endpoint in moved.endpoints().iter() {
                self.endpoints.insert(endpoint.clone(), idx);
            }
        }
    }

    pub fn contains(&self, section: &Section) -> bool {
        self.index_of(section).is_some()
    }

    fn index_of(&self, section: &Section) -> Option<usize> {
        // Equal sections have equal endpoints, so one lookup is enough.
        let idx = *self.endpoints.get(&section.endpoints()[0])?;
        (&self.sections[idx] == section).then(|| idx)
    }

    pub fn junctions(&self) -> HashSet<Junction> {
        self.endpoints.keys().map(|e| e.junction.clone()).collect()
    }

    /// The section connected to the given branch of the given junction.
    pub fn section_at(&self, junction: &Junction, branch: Branch) -> Option<&Section> {
        let endpoint = JunctionBranch::new(junction.clone(), branch);
        self.section_at_endpoint(&endpoint)
    }

    pub fn section_at_endpoint(&self, endpoint: &JunctionBranch) -> Option<&Section> {
        self.endpoints.get(endpoint).map(|idx| &self.sections[*idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> + '_ {
        self.sections.iter()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl<'a> IntoIterator for &'a Track {
    type Item = &'a Section;
    type IntoIter = std::slice::Iter<'a, Section>;
    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}

/// One section per line, in the format read by [`crate::track_reader`].
impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let lines = self.sections.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        write!(f, "{}", lines.join("\n"))
    }
}
