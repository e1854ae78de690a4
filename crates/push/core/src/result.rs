//! Delivery results.

/// Outcome of one push to a batch of recipients.
///
/// Every recipient lands in exactly one of `sent` or `failed`, in the order
/// it was given.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeliveryResult {
    /// Recipients the gateway accepted.
    pub sent: Vec<Sent>,
    /// Recipients the gateway rejected or could not reach.
    pub failed: Vec<Failed>,
}

/// Accepted recipient.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Sent {
    pub device: String,
}

/// Rejected recipient.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Failed {
    /// Device token.
    pub device: String,
    /// Gateway error code or connection error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Gateway HTTP status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Gateway response body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,
}

impl Failed {
    /// Failure identified by an error code.
    pub fn with_error(device: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            device: device.into(),
            error: Some(error.to_string()),
            status: None,
            response: None,
        }
    }

    /// Failure reported by the gateway with a status and response body.
    pub fn with_status(
        device: impl Into<String>,
        status: u16,
        response: Option<serde_json::Value>,
    ) -> Self {
        Self {
            device: device.into(),
            error: None,
            status: Some(status),
            response,
        }
    }
}

impl DeliveryResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted recipient.
    pub fn push_sent(&mut self, device: impl Into<String>) {
        self.sent.push(Sent {
            device: device.into(),
        });
    }

    /// Record a rejected recipient.
    pub fn push_failed(&mut self, failure: Failed) {
        self.failed.push(failure);
    }

    /// Check if every recipient was accepted.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total number of recipients.
    pub fn len(&self) -> usize {
        self.sent.len() + self.failed.len()
    }

    /// Check if no recipients were recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_failure_serializes_sparse() {
        let mut result = DeliveryResult::new();
        result.push_sent("a");
        result.push_failed(Failed::with_error("b", "NotRegistered"));

        assert!(!result.is_success());
        assert_eq!(result.len(), 2);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({
                "sent": [{"device": "a"}],
                "failed": [{"device": "b", "error": "NotRegistered"}],
            })
        );
    }
}
