//! Error types for the checkout client.
//!
//! # Design
//! Every failure leaving the dispatcher is a `DomainError`. The transport's
//! own error, raw HTTP responses, and JSON encode/decode failures never reach
//! the caller; [`translate`] is the single point where they are normalized. Nothing here retries.

use std::fmt;

use serde_json::Value;

use crate::http::{HttpResponse, TransportError};

/// Coarse classification of a failed checkout call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The backend answered 4xx.
    ClientError,
    /// The backend answered 5xx.
    ServerError,
    /// No response was obtained.
    TransportError,
    /// Anything else, including undecodable success bodies.
    UnknownError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::ClientError => "client error",
            ErrorKind::ServerError => "server error",
            ErrorKind::TransportError => "transport error",
            ErrorKind::UnknownError => "unknown error",
        };
        f.write_str(name)
    }
}

/// A failed checkout call, with enough detail for the caller to decide
/// whether to retry, surface, or abort.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}{}: {message}", status_suffix(.status_code))]
pub struct DomainError {
    pub kind: ErrorKind,
    pub status_code: Option<u16>,
    pub message: String,
    /// The backend's error body, parsed as JSON when possible.
    pub payload: Option<Value>,
}

impl DomainError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status_code: None,
            message: message.into(),
            payload: None,
        }
    }

    /// Transport faults, 5xx, and 429 are worth retrying. This layer never
    /// retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self.kind {
            ErrorKind::TransportError | ErrorKind::ServerError => true,
            ErrorKind::ClientError => self.status_code == Some(429),
            ErrorKind::UnknownError => false,
        }
    }
}

/// What went wrong on the way to a successful response.
#[derive(Debug)]
pub enum Failure<'a> {
    /// A response arrived with a non-2xx status.
    Response(&'a HttpResponse),
    /// The transport gave up without a response.
    Transport(TransportError),
    /// The request body could not be encoded as JSON.
    Encode(serde_json::Error),
    /// A 2xx response arrived whose body did not decode into the expected type.
    Decode(&'a HttpResponse, serde_json::Error),
}

/// Map a failed call into a `DomainError`.
pub fn translate(failure: Failure<'_>) -> DomainError {
    match failure {
        Failure::Transport(err) => DomainError::new(ErrorKind::TransportError, err.message),
        Failure::Encode(err) => DomainError::new(
            ErrorKind::UnknownError,
            format!("request body serialization failed: {err}"),
        ),
        Failure::Decode(response, err) => DomainError {
            kind: ErrorKind::UnknownError,
            status_code: Some(response.status),
            message: format!("response body deserialization failed: {err}"),
            payload: payload_of(&response.body),
        },
        Failure::Response(response) => {
            let kind = match response.status {
                400..=499 => ErrorKind::ClientError,
                500..=599 => ErrorKind::ServerError,
                _ => ErrorKind::UnknownError,
            };
            let payload = payload_of(&response.body);
            DomainError {
                kind,
                status_code: Some(response.status),
                message: message_of(response.status, payload.as_ref(), &response.body),
                payload,
            }
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

fn payload_of(body: &str) -> Option<Value> {
    if body.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string())))
}

/// `error.message`, `error`, `message`, raw body, then the status phrase.
fn message_of(status: u16, payload: Option<&Value>, body: &str) -> String {
    if let Some(Value::Object(map)) = payload {
        let candidates = [
            map.get("error").and_then(|e| e.get("message")),
            map.get("error"),
            map.get("message"),
        ];
        if let Some(text) = candidates.into_iter().flatten().find_map(Value::as_str) {
            return text.to_string();
        }
    }
    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    status_phrase(status).to_string()
}

fn status_phrase(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        409 => "Conflict",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unexpected Status",
    }
}
