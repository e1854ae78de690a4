//! GCM provider.

use push_core::{DeliveryResult, DeviceToken, Error, Failed, Notification, Provider};

use crate::{GcmMessage, GcmResponse, GcmSettings, GcmTransport, HttpSender, PROVIDER};

/// Attempts the sender may add on top of the first one.
pub const RETRIES: u32 = 3;

/// Error recorded for a recipient the gateway returned no result for.
pub const MISSING_RESULT: &str = "MissingResult";

/// GCM provider holding one sender for its lifetime.
pub struct GcmProvider<T = HttpSender> {
    transport: T,
}

impl GcmProvider<HttpSender> {
    /// Open a sender bound to the configured API key.
    pub fn new(settings: &GcmSettings) -> Result<Self, Error> {
        Self::with_connector(settings, HttpSender::connect)
    }
}

impl<T: GcmTransport> GcmProvider<T> {
    /// Open the sender with a custom transport.
    pub fn with_connector<F>(settings: &GcmSettings, connect: F) -> Result<Self, Error>
    where
        F: FnOnce(&GcmSettings) -> Result<T, Error>,
    {
        tracing::debug!(?settings, "setting up GCM sender");
        Ok(Self {
            transport: connect(settings)?,
        })
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: GcmTransport> Provider for GcmProvider<T> {
    async fn push_notification(
        &self,
        notification: &Notification,
        device_token: DeviceToken,
    ) -> Result<DeliveryResult, Error> {
        let registration_ids = device_token.into_vec();
        let message =
            GcmMessage::from_notification(notification).map_err(|e| Error::payload(PROVIDER, e))?;

        tracing::debug!(?registration_ids, ?message, "sending GCM message");

        let response = self
            .transport
            .send(&message, &registration_ids, RETRIES)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "cannot send GCM message"))?;

        let result = normalize(&registration_ids, response);
        tracing::debug!(sent = result.sent.len(), failed = result.failed.len(), "GCM result");

        Ok(result)
    }
}

/// Partition recipients by the result at the same index.
fn normalize(registration_ids: &[String], response: GcmResponse) -> DeliveryResult {
    let mut result = DeliveryResult::new();
    let mut results = response.results.into_iter();

    for device in registration_ids {
        match results.next() {
            Some(outcome) => match outcome.error_code() {
                Some(code) => {
                    tracing::warn!(%device, %code, "GCM error code");
                    result.push_failed(Failed::with_error(device.as_str(), code));
                }
                None => result.push_sent(device.as_str()),
            },
            None => {
                tracing::warn!(%device, "GCM response has no result for device");
                result.push_failed(Failed::with_error(device.as_str(), MISSING_RESULT));
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use push_core::Sent;

    use super::*;
    use crate::GcmResult;

    /// Records every send and answers with a fixed response.
    struct MockTransport {
        calls: Mutex<Vec<(GcmMessage, Vec<String>, u32)>>,
        response: Result<GcmResponse, &'static str>,
    }

    impl MockTransport {
        fn answering(results: Vec<GcmResult>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                response: Ok(GcmResponse {
                    results,
                    ..Default::default()
                }),
            }
        }

        fn failing(error: &'static str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                response: Err(error),
            }
        }
    }

    impl GcmTransport for MockTransport {
        async fn send(
            &self,
            message: &GcmMessage,
            registration_ids: &[String],
            retries: u32,
        ) -> Result<GcmResponse, Error> {
            self.calls
                .lock()
                .unwrap()
                .push((message.clone(), registration_ids.to_vec(), retries));

            self.response
                .clone()
                .map_err(|e| Error::transport(PROVIDER, e))
        }
    }

    fn provider(transport: MockTransport) -> GcmProvider<MockTransport> {
        GcmProvider::with_connector(&GcmSettings::new("key"), |_| Ok(transport)).unwrap()
    }

    #[tokio::test]
    async fn test_partitions_by_result_index() {
        let provider = provider(MockTransport::answering(vec![
            GcmResult::ok(),
            GcmResult::error("NotRegistered"),
        ]));

        let result = provider
            .push_notification(&Notification::new(), ["a", "b"].into())
            .await
            .unwrap();

        assert_eq!(result.sent, vec![Sent { device: "a".into() }]);
        assert_eq!(result.failed, vec![Failed::with_error("b", "NotRegistered")]);
    }

    #[tokio::test]
    async fn test_single_token_matches_one_element_list() {
        let provider = provider(MockTransport::answering(vec![GcmResult::ok()]));

        provider
            .push_notification(&Notification::new(), "abc".into())
            .await
            .unwrap();
        provider
            .push_notification(&Notification::new(), vec!["abc".to_string()].into())
            .await
            .unwrap();

        let calls = provider.transport().calls.lock().unwrap();
        assert_eq!(calls[0].1, calls[1].1);
        assert_eq!(calls[0].1, vec!["abc".to_string()]);
    }

    #[tokio::test]
    async fn test_sends_with_three_retries() {
        let provider = provider(MockTransport::answering(vec![GcmResult::ok()]));
        let notification = Notification {
            collapse_key: Some("k".into()),
            ..Default::default()
        }
        .with_alert("hi")
        .with_badge(1);

        provider
            .push_notification(&notification, "a".into())
            .await
            .unwrap();

        let calls = provider.transport().calls.lock().unwrap();
        let (message, _, retries) = &calls[0];
        assert_eq!(*retries, RETRIES);
        assert_eq!(message.collapse_key.as_deref(), Some("k"));
        assert_eq!(message.data["alert"], "hi");
        assert_eq!(message.data["badge"], 1);
    }

    #[tokio::test]
    async fn test_order_preserved_within_partitions() {
        let provider = provider(MockTransport::answering(vec![
            GcmResult::error("InvalidRegistration"),
            GcmResult::ok(),
            GcmResult::error("NotRegistered"),
            GcmResult::ok(),
        ]));

        let result = provider
            .push_notification(&Notification::new(), ["a", "b", "c", "d"].into())
            .await
            .unwrap();

        let sent: Vec<_> = result.sent.iter().map(|s| s.device.as_str()).collect();
        let failed: Vec<_> = result.failed.iter().map(|f| f.device.as_str()).collect();
        assert_eq!(sent, ["b", "d"]);
        assert_eq!(failed, ["a", "c"]);
    }

    #[tokio::test]
    async fn test_transport_error_rejects() {
        let provider = provider(MockTransport::failing("401 Unauthorized"));

        let err = provider
            .push_notification(&Notification::new(), "a".into())
            .await
            .unwrap_err();

        assert!(err.is_transport());
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "401 Unauthorized");
    }

    #[test]
    fn test_missing_results_count_as_failed() {
        let response = GcmResponse {
            results: vec![GcmResult::ok()],
            ..Default::default()
        };

        let result = normalize(&["a".to_string(), "b".to_string()], response);
        assert_eq!(result.sent.len(), 1);
        assert_eq!(result.failed[0].device, "b");
        assert_eq!(result.failed[0].error.as_deref(), Some(MISSING_RESULT));
    }
}
