//! Canonical notification model.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Provider-agnostic push notification.
///
/// Typed fields cover everything a gateway gives first-class treatment.
/// Anything else the caller wants delivered to the device goes in `extra`,
/// which is flattened next to the typed fields when serialized.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Alert text or structured alert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<Alert>,

    /// App icon badge count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<u32>,

    /// Sound file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,

    /// Notification category (actionable notifications).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Wake the app in the background.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_available: Option<bool>,

    /// Arguments substituted into a Safari push URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_args: Option<Vec<String>>,

    /// APNs topic (usually the bundle identifier).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    /// GCM collapse key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapse_key: Option<String>,

    /// GCM: hold the message until the device is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_while_idle: Option<bool>,

    /// Instant after which the notification is no longer worth delivering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<DateTime<Utc>>,

    /// Custom key/value pairs carried to the device.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Notification alert.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Alert {
    /// Plain alert text.
    Text(String),
    /// Title/subtitle/body alert.
    Structured(AlertBody),
}

/// Structured alert content.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl From<&str> for Alert {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Alert {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<AlertBody> for Alert {
    fn from(body: AlertBody) -> Self {
        Self::Structured(body)
    }
}

impl Notification {
    /// Create an empty notification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the alert.
    pub fn with_alert(mut self, alert: impl Into<Alert>) -> Self {
        self.alert = Some(alert.into());
        self
    }

    /// Set the badge count.
    pub fn with_badge(mut self, badge: u32) -> Self {
        self.badge = Some(badge);
        self
    }

    /// Add a custom field.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Expire at a fixed instant.
    pub fn expires_at(mut self, at: DateTime<Utc>) -> Self {
        self.expiration_time = Some(at);
        self
    }

    /// Expire after `ttl` from now.
    pub fn expires_in(self, ttl: std::time::Duration) -> Self {
        let at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.expires_at(at)
    }

    /// Seconds until expiry, measured now.
    ///
    /// `None` when no expiry is set. An expiry in the past yields `Some(0)`.
    pub fn time_to_live_seconds(&self) -> Option<u64> {
        self.time_to_live_seconds_at(Utc::now())
    }

    /// Seconds until expiry, measured at `now`.
    pub fn time_to_live_seconds_at(&self, now: DateTime<Utc>) -> Option<u64> {
        let expiry = self.expiration_time?;
        let remaining = expiry.signed_duration_since(now).num_seconds();
        Some(remaining.max(0) as u64)
    }

    /// All fields, typed and custom, as one JSON object using wire key names.
    ///
    /// Absent typed fields are omitted. Custom fields keep their values,
    /// nulls included.
    pub fn fields(&self) -> Result<Map<String, Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }
}
