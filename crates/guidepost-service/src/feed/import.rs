//! Inbound calendar adapter.
//!
//! Fetches a source's feed over a bounded-timeout request and projects
//! its events into busy intervals. An unreachable or malformed feed is an
//! explicit failure; an empty feed is an empty success.

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use guidepost_core::types::BusyInterval;
use guidepost_db::model::source::CalendarSource;
use guidepost_ical::core::{Component, ICalendar, Property};
use guidepost_ical::parse::{self, ParseError};

use crate::error::{ServiceError, ServiceResult};
use crate::sync::orchestrator::SourceImporter;

/// Why a source could not be synced this cycle.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("invalid feed url: {0}")]
    InvalidUrl(String),

    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed returned HTTP {0}")]
    Status(u16),

    #[error("feed is not valid iCalendar: {0}")]
    Parse(#[from] ParseError),
}

/// Fetches and parses remote calendar feeds.
pub struct FeedImporter {
    http: reqwest::Client,
    default_duration: Duration,
}

impl FeedImporter {
    /// ## Summary
    /// Builds an importer whose requests are bounded by `fetch_timeout`
    /// and whose end-less events get `default_duration`.
    ///
    /// ## Errors
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(fetch_timeout: std::time::Duration, default_duration: Duration) -> ServiceResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(fetch_timeout)
            .build()
            .map_err(|e| ServiceError::InvalidConfiguration(format!("http client: {e}")))?;

        Ok(Self {
            http,
            default_duration,
        })
    }

    #[tracing::instrument(skip(self, source), fields(source_id = %source.id, feed_url = %source.feed_url))]
    async fn fetch(&self, source: &CalendarSource) -> Result<Vec<BusyInterval>, ImportError> {
        let url = reqwest::Url::parse(&source.feed_url)
            .map_err(|e| ImportError::InvalidUrl(format!("{}: {e}", source.feed_url)))?;

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let document = parse::parse(&body)?;

        let intervals = intervals_from_document(source.id, &document, self.default_duration);
        tracing::debug!(count = intervals.len(), "Feed imported");
        Ok(intervals)
    }
}

impl SourceImporter for FeedImporter {
    fn import<'a>(
        &'a self,
        source: &'a CalendarSource,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<BusyInterval>, ImportError>> + Send + 'a>> {
        Box::pin(self.fetch(source))
    }
}

/// ## Summary
/// Projects a parsed calendar document into busy intervals.
///
/// Events need a `UID` and a resolvable `DTSTART`; others are skipped
/// with a warning rather than failing the document. The end comes from
/// `DTEND`, then `DURATION`, then `default_duration` (all-day starts get
/// a one-day default).
#[must_use]
pub fn intervals_from_document(
    source_id: uuid::Uuid,
    document: &ICalendar,
    default_duration: Duration,
) -> Vec<BusyInterval> {
    let mut intervals = Vec::new();

    for event in document.events() {
        let Some(uid) = event.uid() else {
            tracing::warn!(source_id = %source_id, "Skipping event without UID");
            continue;
        };

        let Some(start_prop) = event.get_property("DTSTART") else {
            tracing::warn!(source_id = %source_id, uid, "Skipping event without DTSTART");
            continue;
        };

        let (start, all_day) = match resolve_instant(start_prop) {
            Ok(resolved) => resolved,
            Err(error) => {
                tracing::warn!(source_id = %source_id, uid, %error, "Skipping event with unreadable DTSTART");
                continue;
            }
        };

        let end = match resolve_end(event, start, all_day, default_duration) {
            Ok(end) => end,
            Err(error) => {
                tracing::warn!(source_id = %source_id, uid, %error, "Skipping event with unreadable end");
                continue;
            }
        };

        if end < start {
            tracing::warn!(source_id = %source_id, uid, "Skipping event that ends before it starts");
            continue;
        }

        intervals.push(BusyInterval {
            source_id,
            external_uid: uid.to_string(),
            start,
            end,
            label: event.summary(),
        });
    }

    intervals
}

/// Resolves a DTSTART/DTEND property to a UTC instant, reporting whether
/// it was a date-only (all-day) value.
fn resolve_instant(prop: &Property) -> Result<(DateTime<Utc>, bool), ParseError> {
    let is_date = prop.param("VALUE") == Some("DATE") || !prop.value.contains('T');

    if is_date {
        let date = parse::parse_date(&prop.value)?;
        return Ok((date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc(), true));
    }

    let instant = parse::parse_datetime(&prop.value, prop.param("TZID"))?;
    Ok((instant, false))
}

fn resolve_end(
    event: &Component,
    start: DateTime<Utc>,
    all_day: bool,
    default_duration: Duration,
) -> Result<DateTime<Utc>, ParseError> {
    if let Some(end_prop) = event.get_property("DTEND") {
        let (end, _) = resolve_instant(end_prop)?;
        return Ok(end);
    }

    if let Some(duration_prop) = event.get_property("DURATION") {
        let duration = parse::parse_duration(&duration_prop.value)?;
        return Ok(start + duration);
    }

    let fallback = if all_day {
        Duration::days(1)
    } else {
        default_duration
    };
    Ok(start + fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn default_duration() -> Duration {
        Duration::minutes(60)
    }

    fn parse_doc(input: &str) -> ICalendar {
        parse::parse(input).unwrap()
    }

    fn doc(event_body: &str) -> String {
        format!(
            "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nBEGIN:VEVENT\r\n{event_body}\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n"
        )
    }

    fn source(feed_url: &str) -> CalendarSource {
        CalendarSource {
            id: uuid::Uuid::new_v4(),
            name: "upstream".to_string(),
            feed_url: feed_url.to_string(),
            color_tag: None,
            enabled: true,
            last_synced_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn event_with_start_and_end_resolves() {
        let source_id = uuid::Uuid::new_v4();
        let document = parse_doc(&doc(
            "UID:ev-1\r\nDTSTART:20260805T100000Z\r\nDTEND:20260805T120000Z\r\nSUMMARY:Busy",
        ));

        let intervals = intervals_from_document(source_id, &document, default_duration());
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].external_uid, "ev-1");
        assert_eq!(
            intervals[0].start,
            Utc.with_ymd_and_hms(2026, 8, 5, 10, 0, 0).unwrap()
        );
        assert_eq!(
            intervals[0].end,
            Utc.with_ymd_and_hms(2026, 8, 5, 12, 0, 0).unwrap()
        );
        assert_eq!(intervals[0].label.as_deref(), Some("Busy"));
    }

    #[test]
    fn event_with_duration_resolves() {
        let document = parse_doc(&doc(
            "UID:ev-2\r\nDTSTART:20260805T100000Z\r\nDURATION:PT90M",
        ));

        let intervals = intervals_from_document(uuid::Uuid::new_v4(), &document, default_duration());
        assert_eq!(intervals[0].end - intervals[0].start, Duration::minutes(90));
    }

    #[test]
    fn event_without_end_gets_default_duration() {
        let document = parse_doc(&doc("UID:ev-3\r\nDTSTART:20260805T100000Z"));

        let intervals = intervals_from_document(uuid::Uuid::new_v4(), &document, default_duration());
        assert_eq!(intervals[0].end - intervals[0].start, default_duration());
    }

    #[test]
    fn all_day_event_spans_a_day() {
        let document = parse_doc(&doc("UID:ev-4\r\nDTSTART;VALUE=DATE:20260805"));

        let intervals = intervals_from_document(uuid::Uuid::new_v4(), &document, default_duration());
        assert_eq!(intervals[0].end - intervals[0].start, Duration::days(1));
    }

    #[test]
    fn events_missing_uid_or_start_are_skipped() {
        let input = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nBEGIN:VEVENT\r\nDTSTART:20260805T100000Z\r\nEND:VEVENT\r\nBEGIN:VEVENT\r\nUID:no-start\r\nEND:VEVENT\r\nBEGIN:VEVENT\r\nUID:ok\r\nDTSTART:20260805T100000Z\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
        let document = parse_doc(input);

        let intervals = intervals_from_document(uuid::Uuid::new_v4(), &document, default_duration());
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].external_uid, "ok");
    }

    #[test]
    fn event_with_unknown_timezone_is_skipped() {
        let document = parse_doc(&doc("UID:ev-5\r\nDTSTART;TZID=Nowhere/Else:20260805T100000"));

        let intervals = intervals_from_document(uuid::Uuid::new_v4(), &document, default_duration());
        assert!(intervals.is_empty());
    }

    #[tokio::test]
    async fn importer_fetches_and_parses_feed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/busy.ics"))
            .respond_with(ResponseTemplate::new(200).set_body_string(doc(
                "UID:remote-1\r\nDTSTART:20260805T100000Z\r\nDTEND:20260805T113000Z",
            )))
            .mount(&server)
            .await;

        let importer =
            FeedImporter::new(std::time::Duration::from_secs(2), default_duration()).unwrap();
        let source = source(&format!("{}/busy.ics", server.uri()));

        let intervals = importer.import(&source).await.unwrap();
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].source_id, source.id);
    }

    #[tokio::test]
    async fn http_error_status_is_an_explicit_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let importer =
            FeedImporter::new(std::time::Duration::from_secs(2), default_duration()).unwrap();
        let source = source(&format!("{}/gone.ics", server.uri()));

        let error = importer.import(&source).await.unwrap_err();
        assert!(matches!(error, ImportError::Status(404)));
    }

    #[tokio::test]
    async fn malformed_document_is_an_explicit_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not a calendar"))
            .mount(&server)
            .await;

        let importer =
            FeedImporter::new(std::time::Duration::from_secs(2), default_duration()).unwrap();
        let source = source(&format!("{}/junk.ics", server.uri()));

        let error = importer.import(&source).await.unwrap_err();
        assert!(matches!(error, ImportError::Parse(_)));
    }

    #[tokio::test]
    async fn invalid_url_fails_before_any_request() {
        let importer =
            FeedImporter::new(std::time::Duration::from_secs(2), default_duration()).unwrap();
        let source = source("not a url");

        let error = importer.import(&source).await.unwrap_err();
        assert!(matches!(error, ImportError::InvalidUrl(_)));
    }
}
