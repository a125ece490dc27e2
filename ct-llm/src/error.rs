use serde::Deserialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Malformed caller input, detected before any I/O.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// HTTP 401 from the API.
    #[error("authentication failed (is the API key correctly configured?): {0}")]
    Authentication(String),

    /// Any other non-success response, carrying the upstream message.
    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Network or parse failure surfaced from the transport.
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

/// Upstream error envelope: `{"error":{"message":"..."}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// Classify a non-success response. 401 means a bad credential; everything
/// else carries the server message, falling back when the body has none.
pub(crate) fn error_from_response(status: reqwest::StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|detail| detail.message)
        .unwrap_or_else(|| "Unknown error".to_string());

    if status == reqwest::StatusCode::UNAUTHORIZED {
        ClientError::Authentication(message)
    } else {
        ClientError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn unauthorized_maps_to_authentication_regardless_of_body() {
        let err = error_from_response(StatusCode::UNAUTHORIZED, "not even json");
        match err {
            ClientError::Authentication(message) => assert_eq!(message, "Unknown error"),
            other => panic!("expected Authentication, got {other:?}"),
        }
    }

    #[test]
    fn other_statuses_carry_the_upstream_message() {
        let err = error_from_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error":{"message":"boom"}}"#,
        );
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 500);
                assert!(message.contains("boom"));
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn missing_error_message_falls_back() {
        let err = error_from_response(StatusCode::BAD_REQUEST, r#"{"error":{}}"#);
        match err {
            ClientError::Api { message, .. } => assert_eq!(message, "Unknown error"),
            other => panic!("expected Api, got {other:?}"),
        }
    }
}
