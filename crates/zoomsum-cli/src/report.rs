//! Summary pipeline and output.
//!
//! The summarizer walks meetings in listing order and fetches participants
//! through an injected function, so the pipeline is testable without a live
//! API. A fetch failure is isolated to its meeting: it is logged, the
//! meeting is marked unavailable in the output, and the run continues.

use std::future::Future;

use tracing::{error, info};

use zoomsum_core::format::render_summary;
use zoomsum_core::summary::{Meeting, MeetingSummary, Participant};
use zoomsum_zoom::ZoomResult;

/// Builds one summary per meeting, preserving listing order.
pub async fn summarize<F, Fut>(
    meetings: Vec<Meeting>,
    mut fetch_participants: F,
) -> Vec<MeetingSummary>
where
    F: FnMut(&Meeting) -> Fut,
    Fut: Future<Output = ZoomResult<Vec<Participant>>>,
{
    let mut summaries = Vec::with_capacity(meetings.len());

    for meeting in meetings {
        match fetch_participants(&meeting).await {
            Ok(participants) => {
                info!(
                    "meeting {} has {} participant segments",
                    meeting.id,
                    participants.len()
                );
                summaries.push(MeetingSummary::from_participants(meeting, participants));
            }
            Err(e) => {
                error!("participant fetch failed for meeting {}: {}", meeting.id, e);
                summaries.push(MeetingSummary::unavailable(meeting, e.to_string()));
            }
        }
    }

    summaries
}

/// Writes each summary block to stdout and mirrors it into the log.
pub fn emit(summaries: &[MeetingSummary]) {
    for summary in summaries {
        let block = render_summary(summary);
        println!("{}", block);
        info!("summary for meeting {}:\n{}", summary.meeting.id, block);
    }
}
