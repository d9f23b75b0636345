//! JSON codec for Bot API calls.
//!
//! Every response is wrapped in an envelope:
//! `{"ok": true, "result": ...}` on success or
//! `{"ok": false, "error_code": 400, "description": "..."}` on failure.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Update;

/// Protocol errors that can occur during encoding/decoding.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API reported a failure.
    #[error("API error {code}: {description}")]
    Api {
        /// Error code reported by the API (0 if absent).
        code: i32,
        /// Human-readable description.
        description: String,
    },

    /// `ok` was true but no result was returned.
    #[error("Response is missing its result")]
    MissingResult,
}

/// Response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the call succeeded.
    pub ok: bool,
    /// The call's result.
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    /// Error description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i32>,
}

impl<T> ApiResponse<T> {
    /// Unwrap the envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Api`] when `ok` is false and
    /// [`ProtocolError::MissingResult`] when the result is absent.
    pub fn into_result(self) -> Result<T, ProtocolError> {
        if !self.ok {
            return Err(ProtocolError::Api {
                code: self.error_code.unwrap_or_default(),
                description: self
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            });
        }
        self.result.ok_or(ProtocolError::MissingResult)
    }
}

/// Build the URL of an API method.
#[must_use]
pub fn method_url(base_url: &str, token: &str, method: &str) -> String {
    format!("{}/bot{}/{}", base_url.trim_end_matches('/'), token, method)
}

/// Decode a response body and unwrap its envelope.
///
/// # Errors
///
/// Returns an error if the body is not a valid envelope or reports failure.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ProtocolError> {
    let response: ApiResponse<T> = serde_json::from_slice(body)?;
    response.into_result()
}

/// Decode a `getUpdates` response body.
///
/// # Errors
///
/// Returns an error if the body is invalid or reports failure.
pub fn decode_updates(body: &[u8]) -> Result<Vec<Update>, ProtocolError> {
    decode(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Message;
    use serde_json::json;

    #[test]
    fn test_decode_updates() {
        let body = json!({
            "ok": true,
            "result": [
                {
                    "update_id": 100,
                    "message": {
                        "message_id": 5,
                        "from": {"id": 42, "is_bot": false, "first_name": "Ann", "language_code": "en"},
                        "chat": {"id": 42, "type": "private", "first_name": "Ann"},
                        "date": 1700000000,
                        "text": "/join 0"
                    }
                },
                {
                    "update_id": 101,
                    "edited_message": {"message_id": 5}
                }
            ]
        });
        let updates = decode_updates(&serde_json::to_vec(&body).unwrap()).unwrap();

        assert_eq!(updates.len(), 2);
        let message = updates[0].message.as_ref().unwrap();
        assert_eq!(message.chat.id, 42);
        assert_eq!(message.sender_name(), "Ann");
        assert_eq!(message.text.as_deref(), Some("/join 0"));
        assert!(updates[1].message.is_none());
    }

    #[test]
    fn test_decode_api_error() {
        let body = br#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#;
        match decode_updates(body) {
            Err(ProtocolError::Api { code, description }) => {
                assert_eq!(code, 401);
                assert_eq!(description, "Unauthorized");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_missing_result() {
        assert!(matches!(
            decode::<Message>(br#"{"ok":true}"#),
            Err(ProtocolError::MissingResult)
        ));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(decode_updates(b"<html>"), Err(ProtocolError::Json(_))));
    }

    #[test]
    fn test_method_url() {
        assert_eq!(
            method_url("https://api.telegram.org/", "T0K", "getUpdates"),
            "https://api.telegram.org/botT0K/getUpdates"
        );
    }
}
