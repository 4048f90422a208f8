#![forbid(unsafe_code)]

//! Structured service failures and their user-facing presentation.
//!
//! Collaborator failures arrive as an [`ErrorEnvelope`]; view-models never
//! surface the envelope itself. [`user_facing_message`] resolves it to one
//! display string: an HTTP-status-keyed localized message when one exists,
//! else the envelope's own first message, else a localized generic fallback.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::strings::StringTable;

/// Structured failure from a service capability.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Human-readable messages in server order; may be empty.
    #[serde(default)]
    pub error_messages: Vec<String>,
    /// Application-level error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_code: Option<u32>,
    /// HTTP status of the failed call, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_code: Option<u16>,
}

impl ErrorEnvelope {
    /// An envelope carrying one message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            error_messages: vec![message.into()],
            ..Self::default()
        }
    }

    /// An envelope for an HTTP failure with no message body.
    #[must_use]
    pub fn http(status: u16) -> Self {
        Self {
            http_code: Some(status),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_http_code(mut self, status: u16) -> Self {
        self.http_code = Some(status);
        self
    }

    #[must_use]
    pub fn with_app_code(mut self, code: u32) -> Self {
        self.app_code = Some(code);
        self
    }

    /// First server-provided message, if any.
    #[must_use]
    pub fn first_message(&self) -> Option<&str> {
        self.error_messages.first().map(String::as_str)
    }
}

impl fmt::Display for ErrorEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first_message() {
            Some(msg) => write!(f, "{msg}")?,
            None => write!(f, "service error")?,
        }
        if let Some(http) = self.http_code {
            write!(f, " (http {http})")?;
        }
        if let Some(app) = self.app_code {
            write!(f, " (code {app})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorEnvelope {}

/// Lookup key for a status-specific localized message, when the status is
/// one users routinely hit.
fn status_message_key(status: u16) -> Option<&'static str> {
    match status {
        404 => Some("errors.unknown_resource"),
        401 | 403 => Some("errors.unauthorized"),
        500..=599 => Some("errors.server"),
        _ => None,
    }
}

/// Default generic fallback, shipped in English.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong, please try again.";

/// Resolve an envelope to the single string shown to the user.
///
/// Precedence: localized status-keyed message, then the envelope's first
/// message, then the localized generic fallback.
#[must_use]
pub fn user_facing_message(envelope: &ErrorEnvelope, strings: &dyn StringTable) -> String {
    if let Some(key) = envelope.http_code.and_then(status_message_key) {
        if let Some(localized) = strings.lookup(key) {
            return localized;
        }
    }
    if let Some(message) = envelope.first_message() {
        return message.to_string();
    }
    strings.resolve("errors.generic", GENERIC_ERROR_MESSAGE, &[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strings::{IdentityStrings, KeyedStrings};

    #[test]
    fn status_keyed_lookup_wins_over_envelope_message() {
        let strings = KeyedStrings::from_pairs([
            ("errors.unknown_resource", "We couldn't find that."),
        ]);
        let envelope = ErrorEnvelope::message("raw server text").with_http_code(404);
        assert_eq!(
            user_facing_message(&envelope, &strings),
            "We couldn't find that."
        );
    }

    #[test]
    fn falls_back_to_first_message_without_localization() {
        let envelope = ErrorEnvelope::message("Comment too long").with_http_code(404);
        assert_eq!(
            user_facing_message(&envelope, &IdentityStrings),
            "Comment too long"
        );
    }

    #[test]
    fn empty_envelope_resolves_to_generic_fallback() {
        let envelope = ErrorEnvelope::http(418);
        assert_eq!(
            user_facing_message(&envelope, &IdentityStrings),
            GENERIC_ERROR_MESSAGE
        );
    }

    #[test]
    fn server_errors_share_one_key() {
        let strings = KeyedStrings::from_pairs([("errors.server", "Server trouble.")]);
        for status in [500, 502, 599] {
            let envelope = ErrorEnvelope::http(status);
            assert_eq!(user_facing_message(&envelope, &strings), "Server trouble.");
        }
    }

    #[test]
    fn display_includes_codes() {
        let envelope = ErrorEnvelope::message("nope").with_http_code(422).with_app_code(7);
        assert_eq!(envelope.to_string(), "nope (http 422) (code 7)");
    }

    #[test]
    fn envelope_deserializes_with_missing_fields() {
        let envelope: ErrorEnvelope = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(envelope, ErrorEnvelope::default());
    }
}
