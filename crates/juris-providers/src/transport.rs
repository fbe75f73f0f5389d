//! Shared wire plumbing: transport-failure classification and date parsing.

use chrono::{DateTime, NaiveDate, Utc};
use juris_core::JurisError;
use reqwest::{header::RETRY_AFTER, Response, StatusCode};
use std::time::Duration;

/// Translate a non-success HTTP response into the error taxonomy.
///
/// Consumes the response body for the error message.
pub(crate) async fn classify_response(provider: &str, response: Response) -> JurisError {
    let status = response.status();
    let retry_after = parse_retry_after(&response);
    let body = response.text().await.unwrap_or_default();
    let excerpt: String = body.chars().take(200).collect();

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            JurisError::authentication(provider, excerpt)
        }
        StatusCode::PAYMENT_REQUIRED => JurisError::insufficient_credits(provider, None),
        StatusCode::TOO_MANY_REQUESTS => JurisError::rate_limited(provider, retry_after),
        s if s.is_server_error() => {
            JurisError::unavailable(provider, excerpt, Some(s.as_u16()))
        }
        // Remaining 4xx (404, 409, 422...) mean this provider cannot
        // serve the record; another provider still might.
        s => JurisError::not_found(provider, excerpt, s.as_u16()),
    }
}

/// Translate a reqwest transport error into the error taxonomy.
pub(crate) fn classify_transport(provider: &str, error: &reqwest::Error) -> JurisError {
    if error.is_timeout() {
        JurisError::unavailable(provider, "request timed out", None)
    } else if error.is_connect() {
        JurisError::network(provider, format!("connection failed: {error}"))
    } else {
        JurisError::network(provider, error.to_string())
    }
}

fn parse_retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Parse a provider date field leniently: RFC 3339 first, then bare dates.
///
/// Unparseable values degrade to `None` rather than failing the mapping.
pub(crate) fn parse_date(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%d/%m/%Y") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    None
}
