//! Core types: meetings, attendance, report window, rendering

pub mod format;
pub mod summary;
pub mod time;
pub mod tracing;

pub use format::{ParsedSummary, parse_summary, render_summary};
pub use summary::{
    Attendance, AttendanceInterval, Meeting, MeetingSummary, Participant, ParticipantAttendance,
    collapse_attendance,
};
pub use time::{ReportWindow, format_timestamp};
pub use self::tracing::{TracingConfig, TracingError, init_tracing};
