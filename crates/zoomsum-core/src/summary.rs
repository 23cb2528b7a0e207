//! Meeting and attendance types.
//!
//! A [`Meeting`] and its raw [`Participant`] records come from the API; a
//! [`MeetingSummary`] is derived from them for output. Participants appear
//! once per join segment, so building a summary collapses segments into one
//! [`ParticipantAttendance`] per distinct attendee.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A meeting as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    /// Numeric meeting id.
    pub id: i64,
    /// Meeting topic.
    pub topic: String,
    /// Scheduled start time, UTC.
    pub start_time: DateTime<Utc>,
    /// Scheduled duration in minutes.
    pub duration_minutes: i64,
}

impl Meeting {
    /// Scheduled end time, derived from start plus duration.
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time + Duration::minutes(self.duration_minutes)
    }
}

/// One join segment for one attendee, as returned by the report endpoint.
///
/// An attendee who rejoins a meeting produces multiple records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Display name.
    pub name: String,
    /// Email, when the attendee was signed in.
    pub email: Option<String>,
    /// When this segment started.
    pub join_time: DateTime<Utc>,
    /// When this segment ended.
    pub leave_time: DateTime<Utc>,
}

impl Participant {
    /// The identity used to collapse rejoin segments.
    ///
    /// Email wins over display name since names are not unique across
    /// anonymous joins.
    pub fn identifier(&self) -> &str {
        match self.email.as_deref() {
            Some(email) if !email.is_empty() => email,
            _ => &self.name,
        }
    }

    /// This segment as an attendance interval.
    pub fn interval(&self) -> AttendanceInterval {
        AttendanceInterval {
            joined_at: self.join_time,
            left_at: self.leave_time,
        }
    }
}

/// A single join-to-leave span within a meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceInterval {
    /// Interval start.
    pub joined_at: DateTime<Utc>,
    /// Interval end.
    pub left_at: DateTime<Utc>,
}

impl AttendanceInterval {
    /// Whole minutes spent in this interval, never negative.
    pub fn minutes(&self) -> i64 {
        (self.left_at - self.joined_at).num_minutes().max(0)
    }
}

/// All attendance for one distinct attendee of one meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantAttendance {
    /// Collapse key: email when known, display name otherwise.
    pub identifier: String,
    /// Display name from the first segment seen.
    pub display_name: String,
    /// Join/leave intervals in segment order.
    pub intervals: Vec<AttendanceInterval>,
}

impl ParticipantAttendance {
    /// Total minutes across all intervals.
    pub fn total_minutes(&self) -> i64 {
        self.intervals.iter().map(AttendanceInterval::minutes).sum()
    }
}

/// Participant data for a summary, or the reason it is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attendance {
    /// Participants were fetched and collapsed.
    Recorded(Vec<ParticipantAttendance>),
    /// The participant fetch failed; the meeting is still reported.
    Unavailable {
        /// Human-readable failure description.
        reason: String,
    },
}

/// A per-meeting summary derived from a meeting and its participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingSummary {
    /// The meeting being summarized.
    pub meeting: Meeting,
    /// Collapsed attendance, or the fetch failure.
    pub attendance: Attendance,
}

impl MeetingSummary {
    /// Builds a summary from fetched participant segments.
    pub fn from_participants(meeting: Meeting, participants: Vec<Participant>) -> Self {
        Self {
            meeting,
            attendance: Attendance::Recorded(collapse_attendance(participants)),
        }
    }

    /// Builds a summary for a meeting whose participants could not be fetched.
    pub fn unavailable(meeting: Meeting, reason: impl Into<String>) -> Self {
        Self {
            meeting,
            attendance: Attendance::Unavailable {
                reason: reason.into(),
            },
        }
    }

    /// Number of distinct attendees, or `None` when attendance is unavailable.
    pub fn participant_count(&self) -> Option<usize> {
        match &self.attendance {
            Attendance::Recorded(attendees) => Some(attendees.len()),
            Attendance::Unavailable { .. } => None,
        }
    }
}

/// Collapses raw join segments into one entry per distinct attendee.
///
/// First-seen order is preserved; within an attendee, intervals keep the
/// order the segments arrived in.
pub fn collapse_attendance(participants: Vec<Participant>) -> Vec<ParticipantAttendance> {
    let mut collapsed: Vec<ParticipantAttendance> = Vec::new();

    for participant in participants {
        let identifier = participant.identifier().to_string();
        let interval = participant.interval();

        match collapsed.iter_mut().find(|a| a.identifier == identifier) {
            Some(existing) => existing.intervals.push(interval),
            None => collapsed.push(ParticipantAttendance {
                identifier,
                display_name: participant.name,
                intervals: vec![interval],
            }),
        }
    }

    collapsed
}
