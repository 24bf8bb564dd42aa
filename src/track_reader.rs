//! Reading a track from its line-oriented text description.
//!
//! Each line describes one section:
//!
//! ```text
//! <length> <junction> <branch> <junction> <branch>
//! ```
//!
//! e.g. `10 j1 FACING j2 NORMAL`.

use crate::topology::{Junction, JunctionBranch, Section};
use crate::track::Track;
use log::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Cannot read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Format error in line {line}: {reason}")]
    Format { line: usize, reason: String },
}

impl ReadError {
    fn format(line: usize, reason: impl ToString) -> Self {
        ReadError::Format {
            line,
            reason: reason.to_string(),
        }
    }
}

pub fn read_track(path: &Path) -> Result<Track, ReadError> {
    trace!("Loading track file {}", path.display());
    let contents = std::fs::read_to_string(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_track_str(&contents)
}

pub fn read_track_str(contents: &str) -> Result<Track, ReadError> {
    let mut track = Track::new();
    for (idx, text) in contents.lines().enumerate() {
        let line = idx + 1;
        let section = parse_section(line, text)?;
        if track.contains(&section) {
            return Err(ReadError::format(line, "Duplicate sections detected."));
        }
        track
            .add_section(section)
            .map_err(|e| ReadError::format(line, e))?;
        trace!("line {}: {}", line, text.trim());
    }

    info!(
        "Read track with {} sections and {} junctions",
        track.len(),
        track.junctions().len()
    );
    Ok(track)
}

fn parse_section(line: usize, text: &str) -> Result<Section, ReadError> {
    let mut items = text.split_whitespace();
    let length = items
        .next()
        .and_then(|l| l.parse::<u64>().ok())
        .ok_or_else(|| ReadError::format(line, "Wrong length format."))?;

    let items = items.collect::<Vec<_>>();
    if items.len() != 4 {
        return Err(ReadError::format(line, "Wrong number of items."));
    }

    let a = parse_endpoint(line, items[0], items[1], "first")?;
    let b = parse_endpoint(line, items[2], items[3], "second")?;
    Section::new(length, a, b).map_err(|e| ReadError::format(line, e))
}

fn parse_endpoint(
    line: usize,
    junction: &str,
    branch: &str,
    which: &str,
) -> Result<JunctionBranch, ReadError> {
    let branch = branch.parse().map_err(|_| {
        ReadError::format(line, format!("Wrong format for the {} branch type.", which))
    })?;
    Ok(JunctionBranch::new(Junction::new(junction), branch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Branch;

    fn ep(junction: &str, branch: Branch) -> JunctionBranch {
        JunctionBranch::new(Junction::new(junction), branch)
    }

    fn format_error(contents: &str) -> (usize, String) {
        match read_track_str(contents) {
            Err(ReadError::Format { line, reason }) => (line, reason),
            other => panic!("expected a format error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty() {
        assert!(read_track_str("").unwrap().is_empty());
    }

    #[test]
    fn test_read_sections() {
        let track = read_track_str(
            "10 j1 FACING j2 NORMAL\n  5   j2   FACING j3 REVERSE  \n7 j3 NORMAL j3 FACING\n",
        )
        .unwrap();
        assert_eq!(track.len(), 3);
        assert!(track.contains(
            &Section::new(10, ep("j2", Branch::Normal), ep("j1", Branch::Facing)).unwrap()
        ));
        assert!(track.contains(
            &Section::new(7, ep("j3", Branch::Normal), ep("j3", Branch::Facing)).unwrap()
        ));
    }

    #[test]
    fn test_blank_line() {
        let (line, reason) = format_error("10 j1 FACING j2 NORMAL\n\n5 j2 FACING j3 NORMAL\n");
        assert_eq!(line, 2);
        assert_eq!(reason, "Wrong length format.");
        assert_eq!(format_error("\n"), (1, "Wrong length format.".to_string()));
        assert_eq!(format_error("   "), (1, "Wrong length format.".to_string()));
    }

    #[test]
    fn test_display_reads_back() {
        let text = "10 j1 FACING j2 NORMAL\n5 j2 FACING j3 REVERSE";
        let track = read_track_str(text).unwrap();
        let again = read_track_str(&track.to_string()).unwrap();
        assert_eq!(again.len(), 2);
        for s in track.iter() {
            assert!(again.contains(s));
        }
    }

    #[test]
    fn test_duplicate_and_collision_are_distinct() {
        let (line, reason) = format_error("10 j1 FACING j2 NORMAL\n10 j2 NORMAL j1 FACING\n");
        assert_eq!(line, 2);
        assert_eq!(reason, "Duplicate sections detected.");

        let (line, reason) =
            format_error("10 j1 FACING j2 NORMAL\n3 j3 FACING j4 NORMAL\n9 j2 NORMAL j4 FACING");
        assert_eq!(line, 3);
        assert!(reason.contains("j2 NORMAL"), "{}", reason);
        assert!(reason.starts_with("The track already contains"));
    }

    #[test]
    fn test_bad_branch() {
        assert_eq!(
            format_error("10 j1 FACING j2 SIDEWAYS"),
            (1, "Wrong format for the second branch type.".to_string())
        );
        assert_eq!(
            format_error("4 a NORMAL b REVERSE\n10 j1 facing j2 NORMAL"),
            (2, "Wrong format for the first branch type.".to_string())
        );
    }

    #[test]
    fn test_bad_length() {
        assert_eq!(format_error("ten j1 FACING j2 NORMAL").1, "Wrong length format.");
        assert_eq!(format_error("-3 j1 FACING j2 NORMAL").1, "Wrong length format.");
        let (line, reason) = format_error("0 j1 FACING j2 NORMAL");
        assert_eq!(line, 1);
        assert!(reason.contains("non-positive"));
    }

    #[test]
    fn test_missing_and_extra_items() {
        assert_eq!(format_error("10 j1 FACING j2").1, "Wrong number of items.");
        assert_eq!(format_error("10 j1 FACING").1, "Wrong number of items.");
        assert_eq!(format_error("10").1, "Wrong number of items.");
        assert_eq!(
            format_error("10 j1 FACING j2 NORMAL j3").1,
            "Wrong number of items."
        );
        assert_eq!(
            format_error("10 j1 FACING j2 NORMAL j3 REVERSE").1,
            "Wrong number of items."
        );
    }

    #[test]
    fn test_equal_endpoints() {
        let (_, reason) = format_error("10 j1 FACING j1 FACING");
        assert!(reason.contains("equivalent"));
    }

    #[test]
    fn test_missing_file() {
        match read_track(Path::new("does/not/exist.txt")) {
            Err(ReadError::Io { path, .. }) => assert_eq!(path, Path::new("does/not/exist.txt")),
            other => panic!("expected an I/O error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_data_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/track.txt");
        let track = read_track(&path).unwrap();
        assert_eq!(track.len(), 4);
    }
}
