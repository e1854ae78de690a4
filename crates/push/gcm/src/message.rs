//! GCM wire message and response.

use push_core::Notification;
use serde_json::{Map, Value};

/// Message shaped for the GCM gateway.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct GcmMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapse_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_while_idle: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_live: Option<u64>,
    pub data: Map<String, Value>,
}

impl GcmMessage {
    /// Shape a canonical notification for GCM.
    ///
    /// Every field with a non-null value becomes message data. GCM has no
    /// reserved alert or badge parameters, so those travel as data too.
    pub fn from_notification(notification: &Notification) -> Result<Self, serde_json::Error> {
        let data = notification
            .fields()?
            .into_iter()
            .filter(|(_, value)| !value.is_null())
            .collect();

        Ok(Self {
            collapse_key: notification.collapse_key.clone(),
            delay_while_idle: notification.delay_while_idle,
            time_to_live: notification.time_to_live_seconds(),
            data,
        })
    }
}

/// Gateway response to one send.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GcmResponse {
    #[serde(default)]
    pub multicast_id: Option<i64>,
    #[serde(default)]
    pub success: u64,
    #[serde(default)]
    pub failure: u64,
    #[serde(default)]
    pub canonical_ids: u64,
    /// One entry per registration id, in request order.
    #[serde(default)]
    pub results: Vec<GcmResult>,
}

/// Per-recipient result.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GcmResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Canonical registration id when the device re-registered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GcmResult {
    /// Successful result.
    pub fn ok() -> Self {
        Self::default()
    }

    /// Result carrying an error code.
    pub fn error(code: impl Into<String>) -> Self {
        Self {
            error: Some(code.into()),
            ..Default::default()
        }
    }

    /// Error code, if any.
    pub fn error_code(&self) -> Option<&str> {
        self.error.as_deref().filter(|code| !code.is_empty())
    }

    /// Errors the gateway says are worth resending.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.error_code(),
            Some("Unavailable" | "InternalServerError")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_carries_all_fields_as_data() {
        let notification = Notification {
            collapse_key: Some("chat".into()),
            delay_while_idle: Some(true),
            badge: Some(5),
            ..Default::default()
        }
        .with_alert("Hello")
        .with_extra("conversation", 42)
        .with_extra("dropped", Value::Null);

        let message = GcmMessage::from_notification(&notification).unwrap();
        assert_eq!(message.collapse_key.as_deref(), Some("chat"));
        assert_eq!(message.delay_while_idle, Some(true));
        assert_eq!(message.time_to_live, None);
        assert_eq!(message.data["alert"], "Hello");
        assert_eq!(message.data["badge"], 5);
        assert_eq!(message.data["conversation"], 42);
        assert_eq!(message.data["collapseKey"], "chat");
        assert!(!message.data.contains_key("dropped"));
        assert!(!message.data.contains_key("sound"));
    }

    #[test]
    fn test_message_wire_format() {
        let notification = Notification::new()
            .with_alert("Hi")
            .expires_at(chrono::Utc::now() - chrono::Duration::seconds(10));

        let message = GcmMessage::from_notification(&notification).unwrap();
        let wire = serde_json::to_value(&message).unwrap();
        assert_eq!(wire["time_to_live"], 0);
        assert_eq!(wire["data"]["alert"], "Hi");
        assert!(wire.get("collapse_key").is_none());
    }

    #[test]
    fn test_parse_gateway_response() {
        let response: GcmResponse = serde_json::from_str(
            r#"{"multicast_id": 108, "success": 1, "failure": 1, "canonical_ids": 0,
                "results": [{"message_id": "1:08"}, {"error": "NotRegistered"}]}"#,
        )
        .unwrap();

        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].error_code(), None);
        assert_eq!(response.results[1].error_code(), Some("NotRegistered"));
        assert!(!response.results[1].is_retryable());
        assert!(GcmResult::error("Unavailable").is_retryable());
    }
}
