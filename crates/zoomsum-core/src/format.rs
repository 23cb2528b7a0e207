//! Summary rendering.
//!
//! One block of text per meeting, written both to the console and to the log
//! sink. [`parse_summary`] reads the meeting id and scheduled duration back
//! out of a rendered block, which keeps the output machine-checkable.

use crate::summary::{Attendance, MeetingSummary, ParticipantAttendance};
use crate::time::format_timestamp;

/// Renders one meeting summary as a multi-line block.
pub fn render_summary(summary: &MeetingSummary) -> String {
    let meeting = &summary.meeting;
    let mut out = String::new();

    out.push_str(&format!("Meeting: {} (id {})\n", meeting.topic, meeting.id));
    out.push_str(&format!("  Start: {} UTC\n", format_timestamp(meeting.start_time)));
    out.push_str(&format!("  End:   {} UTC\n", format_timestamp(meeting.end_time())));
    out.push_str(&format!(
        "  Scheduled duration: {} minutes\n",
        meeting.duration_minutes
    ));

    match &summary.attendance {
        Attendance::Recorded(attendees) => {
            out.push_str(&format!("  Participants: {}\n", attendees.len()));
            for attendee in attendees {
                out.push_str(&render_attendee(attendee));
            }
        }
        Attendance::Unavailable { reason } => {
            out.push_str(&format!("  Participants: unavailable ({})\n", reason));
        }
    }

    out
}

fn render_attendee(attendee: &ParticipantAttendance) -> String {
    let spans = attendee
        .intervals
        .iter()
        .map(|i| {
            format!(
                "{} to {}",
                format_timestamp(i.joined_at),
                format_timestamp(i.left_at)
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "    - {}: {} ({} minutes)\n",
        attendee.identifier,
        spans,
        attendee.total_minutes()
    )
}

/// Fields recovered from a rendered summary block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSummary {
    /// Meeting id from the header line.
    pub meeting_id: i64,
    /// Scheduled duration in minutes.
    pub duration_minutes: i64,
}

/// Parses the meeting id and scheduled duration out of a rendered block.
///
/// Returns `None` when the block does not look like [`render_summary`]
/// output.
pub fn parse_summary(block: &str) -> Option<ParsedSummary> {
    let mut meeting_id = None;
    let mut duration_minutes = None;

    for line in block.lines() {
        let line = line.trim();
        if line.starts_with("Meeting:") {
            let id = line.rsplit_once("(id ")?.1.strip_suffix(')')?;
            meeting_id = id.parse::<i64>().ok();
        } else if let Some(rest) = line.strip_prefix("Scheduled duration:") {
            let minutes = rest.trim().strip_suffix("minutes")?.trim();
            duration_minutes = minutes.parse::<i64>().ok();
        }
    }

    Some(ParsedSummary {
        meeting_id: meeting_id?,
        duration_minutes: duration_minutes?,
    })
}
