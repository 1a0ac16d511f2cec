//! Single SMS record as read from a backup.
//!
//! [`SmsMessage`] is transient: the streaming reader produces one per `sms`
//! element, and the aggregator or exporter drops it as soon as the fields it
//! needs have been folded in.
//!
//! # Examples
//!
//! ```
//! use smsslicer::{Direction, SmsMessage};
//!
//! let msg = SmsMessage::new("+15550100", 1_700_000_000_000, Direction::Sent)
//!     .with_contact_name("Alice")
//!     .with_body("On my way");
//!
//! assert!(msg.direction.is_sent());
//! assert_eq!(msg.contact_name.as_deref(), Some("Alice"));
//! ```

use serde::{Deserialize, Serialize};

/// Raw `type` code marking an outgoing message.
pub const SENT_TYPE_CODE: &str = "2";

/// Whether a message was sent from the backed-up phone or received by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Outgoing message (`type="2"`)
    Sent,
    /// Anything else
    Received,
}

impl Direction {
    /// Derives the direction from the raw `type` attribute.
    ///
    /// ```
    /// use smsslicer::Direction;
    ///
    /// assert_eq!(Direction::from_type_code("2"), Direction::Sent);
    /// assert_eq!(Direction::from_type_code("1"), Direction::Received);
    /// assert_eq!(Direction::from_type_code("5"), Direction::Received);
    /// ```
    pub fn from_type_code(code: &str) -> Self {
        if code == SENT_TYPE_CODE {
            Direction::Sent
        } else {
            Direction::Received
        }
    }

    /// Returns the literal used in exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Sent => "sent",
            Direction::Received => "received",
        }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, Direction::Sent)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message from an SMS backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsMessage {
    /// Contact identifier, usually a phone number. Key of the statistics table.
    pub address: String,

    /// Contact display name; `None` when the attribute is absent or empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub contact_name: Option<String>,

    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,

    pub direction: Direction,

    /// Message text. Empty when absent, and always empty when the reader
    /// was told to skip bodies.
    #[serde(default)]
    pub body: String,
}

impl SmsMessage {
    /// Creates a message with no contact name and an empty body.
    pub fn new(address: impl Into<String>, timestamp: i64, direction: Direction) -> Self {
        Self {
            address: address.into(),
            contact_name: None,
            timestamp,
            direction,
            body: String::new(),
        }
    }

    /// Sets the contact name. Empty names are stored as `None`.
    #[must_use]
    pub fn with_contact_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.contact_name = if name.is_empty() { None } else { Some(name) };
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_type_code() {
        assert_eq!(Direction::from_type_code("2"), Direction::Sent);
        assert_eq!(Direction::from_type_code("1"), Direction::Received);
        assert_eq!(Direction::from_type_code(""), Direction::Received);
        assert_eq!(Direction::from_type_code(" 2"), Direction::Received);
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(Direction::Sent.to_string(), "sent");
        assert_eq!(Direction::Received.to_string(), "received");
    }

    #[test]
    fn test_empty_contact_name_is_none() {
        let msg = SmsMessage::new("+1", 0, Direction::Received).with_contact_name("");
        assert!(msg.contact_name.is_none());
    }

    #[test]
    fn test_serde_lowercase_direction() {
        let msg = SmsMessage::new("+1", 5, Direction::Sent);
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"direction\":\"sent\""));
        assert!(!json.contains("contact_name"));

        let parsed: SmsMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, msg);
    }
}
