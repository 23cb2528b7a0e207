//! Zoom REST API client.
//!
//! A low-level HTTP client for the endpoints the summary pipeline needs:
//! the current user, the meetings listing, and the per-meeting participant
//! report. Responses are parsed into typed records and validated at the
//! boundary; pagination goes through [`PageCursor`].

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use zoomsum_core::summary::{Meeting, Participant};
use zoomsum_core::time::ReportWindow;

use crate::config::ZoomConfig;
use crate::error::{ZoomError, ZoomResult};
use crate::page::{Page, PageCursor};
use crate::tokens::AccessToken;

/// Maps a reqwest transport failure to a [`ZoomError`].
pub(crate) fn transport_error(e: reqwest::Error) -> ZoomError {
    if e.is_timeout() {
        ZoomError::network("request timeout")
    } else if e.is_connect() {
        ZoomError::network(format!("connection failed: {}", e))
    } else {
        ZoomError::network(format!("request failed: {}", e))
    }
}

/// The acting user, resolved from `/users/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct ZoomUser {
    /// The user id used in the meetings listing path.
    pub id: String,
    /// The user's email, when exposed.
    #[serde(default)]
    pub email: Option<String>,
}

/// Zoom API client.
#[derive(Debug)]
pub struct ZoomClient {
    http_client: reqwest::Client,
    api_base: String,
    page_size: u32,
}

impl ZoomClient {
    /// Creates a client from the provider configuration.
    pub fn new(config: &ZoomConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("failed to create HTTP client");

        Self {
            http_client,
            api_base: config.api_base.clone(),
            page_size: config.page_size,
        }
    }

    /// Resolves the user the token acts as.
    pub async fn current_user(&self, token: &AccessToken) -> ZoomResult<ZoomUser> {
        let body = self.get(token, "/users/me", &[]).await?;
        let user: ZoomUser = serde_json::from_str(&body).map_err(|e| {
            ZoomError::invalid_response(format!("failed to parse user response: {}", e))
                .with_endpoint("/users/me")
        })?;

        debug!("resolved acting user {}", user.id);
        Ok(user)
    }

    /// Lists all scheduled meetings for `user` inside the window.
    ///
    /// Pages are fetched until the API stops returning a `next_page_token`;
    /// API order is preserved. A failure on any page fails the whole
    /// listing and discards pages already fetched.
    pub async fn list_meetings(
        &self,
        token: &AccessToken,
        user: &str,
        window: &ReportWindow,
    ) -> ZoomResult<Vec<Meeting>> {
        let cursor =
            PageCursor::new(move |page_token| self.meetings_page(token, user, window, page_token));
        let meetings = cursor.collect_all().await?;

        debug!("fetched {} meetings for user {}", meetings.len(), user);
        Ok(meetings)
    }

    /// Lists all participant segments recorded for one meeting.
    ///
    /// A meeting nobody joined yields an empty Vec, not an error.
    pub async fn list_participants(
        &self,
        token: &AccessToken,
        meeting_id: i64,
    ) -> ZoomResult<Vec<Participant>> {
        let cursor =
            PageCursor::new(move |page_token| self.participants_page(token, meeting_id, page_token));
        let participants = cursor.collect_all().await?;

        debug!(
            "fetched {} participant segments for meeting {}",
            participants.len(),
            meeting_id
        );
        Ok(participants)
    }

    /// Fetches one page of the meetings listing.
    async fn meetings_page(
        &self,
        token: &AccessToken,
        user: &str,
        window: &ReportWindow,
        page_token: Option<String>,
    ) -> ZoomResult<Page<Meeting>> {
        let path = format!("/users/{}/meetings", user);
        let mut query = vec![
            ("type", "scheduled".to_string()),
            ("page_size", self.page_size.to_string()),
            ("from", window.from_date().to_string()),
            ("to", window.to_date().to_string()),
        ];
        if let Some(next) = page_token {
            query.push(("next_page_token", next));
        }

        let body = self.get(token, &path, &query).await?;
        let response: MeetingListResponse = serde_json::from_str(&body).map_err(|e| {
            ZoomError::invalid_response(format!("failed to parse meetings response: {}", e))
                .with_endpoint(path.clone())
        })?;

        let meetings = response
            .meetings
            .into_iter()
            .map(|m| convert_meeting(m, &path))
            .collect::<ZoomResult<Vec<_>>>()?;

        Ok(Page {
            items: meetings,
            next_page_token: response.next_page_token,
        })
    }

    /// Fetches one page of the participant report for a meeting.
    async fn participants_page(
        &self,
        token: &AccessToken,
        meeting_id: i64,
        page_token: Option<String>,
    ) -> ZoomResult<Page<Participant>> {
        let path = format!("/report/meetings/{}/participants", meeting_id);
        let mut query = vec![("page_size", self.page_size.to_string())];
        if let Some(next) = page_token {
            query.push(("next_page_token", next));
        }

        let body = self.get(token, &path, &query).await?;
        let response: ParticipantListResponse = serde_json::from_str(&body).map_err(|e| {
            ZoomError::invalid_response(format!("failed to parse participants response: {}", e))
                .with_endpoint(path.clone())
        })?;

        let participants = response
            .participants
            .into_iter()
            .map(|p| convert_participant(p, &path))
            .collect::<ZoomResult<Vec<_>>>()?;

        Ok(Page {
            items: participants,
            next_page_token: response.next_page_token,
        })
    }

    /// Performs an authenticated GET and returns the response body.
    async fn get(
        &self,
        token: &AccessToken,
        path: &str,
        query: &[(&str, String)],
    ) -> ZoomResult<String> {
        let url = format!("{}{}", self.api_base, path);
        let started = Instant::now();

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token.secret())
            .query(query)
            .send()
            .await
            .map_err(|e| transport_error(e).with_endpoint(path.to_string()))?;

        let status = response.status();
        debug!("GET {} -> {} in {:?}", path, status, started.elapsed());

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ZoomError::authentication("access token expired or invalid")
                .with_endpoint(path.to_string()));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ZoomError::not_found("resource not found").with_endpoint(path.to_string()));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            return Err(ZoomError::rate_limited(format!(
                "rate limit exceeded{}",
                retry_after
                    .map(|s| format!(", retry after {} seconds", s))
                    .unwrap_or_default()
            ))
            .with_endpoint(path.to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = if status.is_client_error() {
                ZoomError::bad_request(format!("API error ({}): {}", status, body.trim()))
            } else {
                ZoomError::server(format!("API error ({}): {}", status, body.trim()))
            };
            return Err(err.with_endpoint(path.to_string()));
        }

        response
            .text()
            .await
            .map_err(|e| transport_error(e).with_endpoint(path.to_string()))
    }
}

/// Converts an API meeting into the domain record, rejecting records with
/// missing required fields.
fn convert_meeting(meeting: ApiMeeting, endpoint: &str) -> ZoomResult<Meeting> {
    let id = meeting
        .id
        .ok_or_else(|| missing_field("meeting.id", endpoint))?;
    let start_time = meeting
        .start_time
        .ok_or_else(|| missing_field("meeting.start_time", endpoint))?;
    let duration_minutes = meeting
        .duration
        .ok_or_else(|| missing_field("meeting.duration", endpoint))?;

    Ok(Meeting {
        id,
        topic: meeting.topic.unwrap_or_default(),
        start_time: parse_time(&start_time, "meeting.start_time", endpoint)?,
        duration_minutes,
    })
}

/// Converts an API participant segment into the domain record.
fn convert_participant(participant: ApiParticipant, endpoint: &str) -> ZoomResult<Participant> {
    let name = participant
        .name
        .ok_or_else(|| missing_field("participant.name", endpoint))?;
    let join_time = participant
        .join_time
        .ok_or_else(|| missing_field("participant.join_time", endpoint))?;
    let leave_time = participant
        .leave_time
        .ok_or_else(|| missing_field("participant.leave_time", endpoint))?;

    Ok(Participant {
        name,
        email: participant.user_email.filter(|e| !e.is_empty()),
        join_time: parse_time(&join_time, "participant.join_time", endpoint)?,
        leave_time: parse_time(&leave_time, "participant.leave_time", endpoint)?,
    })
}

fn missing_field(field: &str, endpoint: &str) -> ZoomError {
    ZoomError::invalid_response(format!("response record missing {}", field))
        .with_endpoint(endpoint.to_string())
}

fn parse_time(value: &str, field: &str, endpoint: &str) -> ZoomResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            ZoomError::invalid_response(format!("failed to parse {}: {}", field, e))
                .with_endpoint(endpoint.to_string())
        })
}

/// Response from the meetings listing endpoint.
#[derive(Debug, Deserialize)]
struct MeetingListResponse {
    #[serde(default)]
    meetings: Vec<ApiMeeting>,
    next_page_token: Option<String>,
}

/// A single meeting from the listing endpoint.
#[derive(Debug, Deserialize)]
struct ApiMeeting {
    id: Option<i64>,
    topic: Option<String>,
    start_time: Option<String>,
    duration: Option<i64>,
}

/// Response from the participant report endpoint.
#[derive(Debug, Deserialize)]
struct ParticipantListResponse {
    #[serde(default)]
    participants: Vec<ApiParticipant>,
    next_page_token: Option<String>,
}

/// A single join segment from the participant report.
#[derive(Debug, Deserialize)]
struct ApiParticipant {
    name: Option<String>,
    user_email: Option<String>,
    join_time: Option<String>,
    leave_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ZoomErrorCode;

    #[test]
    fn parse_meeting_list_response() {
        let json = r#"{
            "page_size": 300,
            "next_page_token": "tok-2",
            "meetings": [
                {
                    "id": 81234567890,
                    "topic": "Weekly sync",
                    "type": 2,
                    "start_time": "2024-03-12T10:00:00Z",
                    "duration": 60,
                    "timezone": "UTC"
                }
            ]
        }"#;

        let response: MeetingListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.meetings.len(), 1);
        assert_eq!(response.next_page_token.as_deref(), Some("tok-2"));

        let meeting = convert_meeting(response.meetings.into_iter().next().unwrap(), "/test")
            .unwrap();
        assert_eq!(meeting.id, 81234567890);
        assert_eq!(meeting.topic, "Weekly sync");
        assert_eq!(meeting.duration_minutes, 60);
    }

    #[test]
    fn parse_meeting_list_without_token() {
        let json = r#"{"meetings": []}"#;
        let response: MeetingListResponse = serde_json::from_str(json).unwrap();
        assert!(response.meetings.is_empty());
        assert!(response.next_page_token.is_none());
    }

    #[test]
    fn meeting_missing_start_time_is_rejected() {
        let json = r#"{"id": 123, "topic": "Broken", "duration": 30}"#;
        let meeting: ApiMeeting = serde_json::from_str(json).unwrap();

        let err = convert_meeting(meeting, "/test").unwrap_err();
        assert_eq!(err.code(), ZoomErrorCode::InvalidResponse);
        assert!(err.message().contains("start_time"));
    }

    #[test]
    fn meeting_bad_timestamp_is_rejected() {
        let json = r#"{"id": 123, "start_time": "yesterday", "duration": 30}"#;
        let meeting: ApiMeeting = serde_json::from_str(json).unwrap();
        assert!(convert_meeting(meeting, "/test").is_err());
    }

    #[test]
    fn parse_participant_response() {
        let json = r#"{
            "next_page_token": "",
            "participants": [
                {
                    "id": "u-1",
                    "name": "Alice",
                    "user_email": "alice@example.com",
                    "join_time": "2024-03-12T10:01:00Z",
                    "leave_time": "2024-03-12T10:59:00Z"
                },
                {
                    "name": "Guest",
                    "user_email": "",
                    "join_time": "2024-03-12T10:05:00Z",
                    "leave_time": "2024-03-12T10:30:00Z"
                }
            ]
        }"#;

        let response: ParticipantListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.participants.len(), 2);

        let converted: Vec<Participant> = response
            .participants
            .into_iter()
            .map(|p| convert_participant(p, "/test").unwrap())
            .collect();

        assert_eq!(converted[0].email.as_deref(), Some("alice@example.com"));
        // Empty email collapses to the display name as identifier
        assert!(converted[1].email.is_none());
        assert_eq!(converted[1].identifier(), "Guest");
    }

    #[test]
    fn participant_missing_leave_time_is_rejected() {
        let json = r#"{"name": "Alice", "join_time": "2024-03-12T10:01:00Z"}"#;
        let participant: ApiParticipant = serde_json::from_str(json).unwrap();

        let err = convert_participant(participant, "/test").unwrap_err();
        assert!(err.message().contains("leave_time"));
    }

    #[test]
    fn parse_user_response() {
        let json = r#"{"id": "u-abc", "email": "owner@example.com", "type": 2}"#;
        let user: ZoomUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "u-abc");
        assert_eq!(user.email.as_deref(), Some("owner@example.com"));
    }

    #[test]
    fn parse_time_offset_normalized_to_utc() {
        let parsed = parse_time("2024-03-12T12:00:00+02:00", "t", "/test").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-03-12T10:00:00+00:00");
    }
}
