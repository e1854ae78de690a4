//! APNs provider.

use push_core::{DeliveryResult, DeviceToken, Error, Notification, Provider};

use crate::{A2Transport, ApnsNotification, ApnsOptions, ApnsSettings, ApnsTransport, PROVIDER};

/// APNs provider holding one connection for its lifetime.
pub struct ApnsProvider<T = A2Transport> {
    options: ApnsOptions,
    transport: T,
}

impl ApnsProvider<A2Transport> {
    /// Resolve options from settings and open the APNs connection.
    pub fn new(settings: &ApnsSettings) -> Result<Self, Error> {
        Self::with_connector(settings, A2Transport::connect)
    }
}

impl<T: ApnsTransport> ApnsProvider<T> {
    /// Resolve options and open the connection with a custom transport.
    pub fn with_connector<F>(settings: &ApnsSettings, connect: F) -> Result<Self, Error>
    where
        F: FnOnce(&ApnsOptions) -> Result<T, Error>,
    {
        let options = ApnsOptions::resolve(settings);
        tracing::debug!(?options, "setting up APNs push connection");

        let transport = connect(&options)?;

        Ok(Self { options, transport })
    }

    /// Resolved connection options.
    pub fn options(&self) -> &ApnsOptions {
        &self.options
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: ApnsTransport> Provider for ApnsProvider<T> {
    async fn push_notification(
        &self,
        notification: &Notification,
        device_token: DeviceToken,
    ) -> Result<DeliveryResult, Error> {
        let devices = device_token.into_vec();
        let note = ApnsNotification::from_notification(notification)
            .map_err(|e| Error::payload(PROVIDER, e))?;

        tracing::debug!(?devices, expiry = ?note.expiry, "pushing APNs notification");

        let response = self.transport.send(&note, &devices).await?;

        for sent in &response.sent {
            tracing::debug!(device = %sent.device, "notification sent");
        }
        for failure in &response.failed {
            match &failure.error {
                Some(error) => {
                    tracing::warn!(device = %failure.device, %error, "notification error");
                }
                None => {
                    tracing::warn!(
                        device = %failure.device,
                        status = ?failure.status,
                        response = ?failure.response,
                        "notification failed"
                    );
                }
            }
        }

        Ok(response)
    }
}
