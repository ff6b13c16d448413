//! Turning failed requests into user-facing alerts.
//!
//! Pure functions only; the client decides when to call them and what to
//! broadcast.

use crate::constants::{FALLBACK_ERROR_MESSAGE, NETWORK_ERROR_MESSAGE};
use crate::notify::{Alert, Severity};
use reqwest::StatusCode;
use serde_json::Value;

/// 400 is a user mistake; everything else is treated as an error.
pub fn severity_for_status(status: u16) -> Severity {
    if status == 400 {
        Severity::Warning
    } else {
        Severity::Error
    }
}

/// Pick the most useful message out of an error response.
///
/// Precedence: string `detail`, then the `msg` fields of a `detail` list
/// joined by spaces, then a string `message`, then the status text, then
/// the error code. Empty candidates are skipped.
pub fn extract_message(body: Option<&Value>, status_text: Option<&str>, code: Option<&str>) -> String {
    body.and_then(message_from_body)
        .or_else(|| non_empty(status_text))
        .or_else(|| non_empty(code))
        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string())
}

fn message_from_body(body: &Value) -> Option<String> {
    let object = body.as_object()?;

    match object.get("detail") {
        Some(Value::String(detail)) if !detail.is_empty() => return Some(detail.clone()),
        Some(Value::Array(items)) => {
            let joined = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join(" ");
            if !joined.is_empty() {
                return Some(joined);
            }
        }
        _ => {}
    }

    object
        .get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Alert for a failure that never produced a response.
pub fn network_alert() -> Alert {
    Alert::error(NETWORK_ERROR_MESSAGE)
}

/// Alert for an HTTP error response with the raw body bytes.
pub fn response_alert(status: StatusCode, body: &[u8]) -> Alert {
    let parsed: Option<Value> = serde_json::from_slice(body).ok();
    let message = extract_message(parsed.as_ref(), status.canonical_reason(), None);
    Alert::new(message, severity_for_status(status.as_u16()))
}
