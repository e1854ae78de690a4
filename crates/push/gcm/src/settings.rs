//! GCM settings.

/// Default legacy HTTP endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://fcm.googleapis.com/fcm/send";

/// GCM settings as read from configuration.
#[derive(Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcmSettings {
    /// Server API key.
    pub server_api_key: String,

    /// Gateway endpoint override.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl GcmSettings {
    /// Settings for the default endpoint.
    pub fn new(server_api_key: impl Into<String>) -> Self {
        Self {
            server_api_key: server_api_key.into(),
            endpoint: None,
        }
    }

    /// Endpoint to send to.
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }
}

impl std::fmt::Debug for GcmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcmSettings")
            .field("server_api_key", &"<redacted>")
            .field("endpoint", &self.endpoint())
            .finish()
    }
}
