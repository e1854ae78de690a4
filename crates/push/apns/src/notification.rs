//! APNs wire notification.

use push_core::{Alert, Notification};
use serde_json::{Map, Value};

const APS_KEY: &str = "aps";

/// Notification shaped for the APNs gateway.
///
/// Typed fields map to the `aps` dictionary and request headers. `payload`
/// holds every field of the source notification, typed ones included, and
/// is sent as custom root keys so the app sees the full original object.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApnsNotification {
    /// Seconds the gateway should keep trying. `None` uses the gateway default.
    pub expiry: Option<u64>,
    pub badge: Option<u32>,
    pub sound: Option<String>,
    pub alert: Option<Alert>,
    pub category: Option<String>,
    pub content_available: Option<bool>,
    /// Safari URL arguments. The a2 builder has no `url-args` setter, so
    /// these travel only as the `urlArgs` root key of `payload`, never inside
    /// `aps`.
    pub url_args: Option<Vec<String>>,
    pub topic: Option<String>,
    pub payload: Map<String, Value>,
}

impl ApnsNotification {
    /// Shape a canonical notification for APNs.
    ///
    /// A custom `aps` key is dropped: the gateway reserves that root key.
    pub fn from_notification(notification: &Notification) -> Result<Self, serde_json::Error> {
        let mut payload = notification.fields()?;
        if payload.remove(APS_KEY).is_some() {
            tracing::warn!("dropping custom `aps` field, the key is reserved");
        }

        Ok(Self {
            // Zero means already expired; leave expiry to the gateway default.
            expiry: notification.time_to_live_seconds().filter(|&ttl| ttl > 0),
            badge: notification.badge,
            sound: notification.sound.clone(),
            alert: notification.alert.clone(),
            category: notification.category.clone(),
            content_available: notification.content_available,
            url_args: notification.url_args.clone(),
            topic: notification.topic.clone(),
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_fields_duplicated_into_payload() {
        let notification = Notification {
            content_available: Some(true),
            sound: Some("ping.aiff".into()),
            topic: Some("com.example.app".into()),
            ..Default::default()
        }
        .with_extra("foo", "bar");

        let note = ApnsNotification::from_notification(&notification).unwrap();
        assert_eq!(note.content_available, Some(true));
        assert_eq!(note.sound.as_deref(), Some("ping.aiff"));
        assert_eq!(note.topic.as_deref(), Some("com.example.app"));
        assert_eq!(note.payload["foo"], "bar");
        assert_eq!(note.payload["contentAvailable"], true);
        assert_eq!(note.payload["sound"], "ping.aiff");
    }

    #[test]
    fn test_expired_notification_uses_default_expiry() {
        let notification =
            Notification::new().expires_at(chrono::Utc::now() - chrono::Duration::minutes(5));

        let note = ApnsNotification::from_notification(&notification).unwrap();
        assert_eq!(note.expiry, None);
    }

    #[test]
    fn test_future_expiry_is_seconds_to_live() {
        let notification = Notification::new().expires_in(std::time::Duration::from_secs(3600));

        let note = ApnsNotification::from_notification(&notification).unwrap();
        let expiry = note.expiry.unwrap();
        assert!(expiry > 3590 && expiry <= 3600);
    }

    #[test]
    fn test_url_args_travel_in_payload() {
        let notification = Notification {
            url_args: Some(vec!["promo".into()]),
            ..Default::default()
        };

        let note = ApnsNotification::from_notification(&notification).unwrap();
        assert_eq!(note.url_args, Some(vec!["promo".to_string()]));
        assert_eq!(note.payload["urlArgs"], serde_json::json!(["promo"]));
    }

    #[test]
    fn test_custom_aps_field_dropped() {
        let notification = Notification::new()
            .with_badge(1)
            .with_extra("aps", serde_json::json!({"badge": 99}))
            .with_extra("foo", "bar");

        let note = ApnsNotification::from_notification(&notification).unwrap();
        assert!(!note.payload.contains_key("aps"));
        assert_eq!(note.payload["foo"], "bar");
        assert_eq!(note.badge, Some(1));
    }
}
