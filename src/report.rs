use crate::scenario::SegmentRef;
use crate::segment::Segment;
use serde_json::json;
use std::path::Path;

pub fn write_allocation_json(
    filename: &Path,
    names: &[String],
    allocated: &[Vec<Segment>],
) -> std::io::Result<()> {
    std::fs::write(
        filename,
        serde_json::to_string_pretty(&allocation_json(names, allocated))?,
    )?;
    Ok(())
}

fn allocation_json(names: &[String], allocated: &[Vec<Segment>]) -> serde_json::Value {
    let trains = names
        .iter()
        .zip(allocated.iter())
        .map(|(name, route)| {
            let segments = route.iter().map(SegmentRef::from).collect::<Vec<_>>();
            json!({ "name": name, "allocated": segments })
        })
        .collect::<Vec<_>>();
    json!({ "trains": trains })
}

/// One line per train. Requested segments are marked `+` when granted,
/// `~` when cut short and `-` when refused.
pub fn print_allocation(
    names: &[String],
    requested: &[Vec<Segment>],
    allocated: &[Vec<Segment>],
) -> String {
    let mut summary = String::new();
    for ((name, request), route) in names.iter().zip(requested.iter()).zip(allocated.iter()) {
        summary.push_str(&format!("{:<8}", name));
        let marks = request
            .iter()
            .enumerate()
            .map(|(idx, segment)| match route.get(idx) {
                Some(granted) if granted == segment => {
                    format!("+{}..{}", segment.start_offset(), segment.end_offset())
                }
                Some(granted) => format!(
                    "~{}..{}({})",
                    segment.start_offset(),
                    segment.end_offset(),
                    granted.end_offset()
                ),
                None => format!("-{}..{}", segment.start_offset(), segment.end_offset()),
            })
            .collect::<Vec<_>>();
        if marks.is_empty() {
            summary.push_str(" (no request)");
        } else {
            summary.push(' ');
            summary.push_str(&marks.join(" "));
        }
        summary.push('\n');
    }
    summary
}
