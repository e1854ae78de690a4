//! Provider over every supported backend.

use push_apns::ApnsProvider;
use push_core::{DeliveryResult, DeviceToken, Error, Notification, Provider};
use push_gcm::GcmProvider;

use crate::Platform;

/// One of the concrete providers.
pub enum AnyProvider {
    Apns(ApnsProvider),
    Gcm(GcmProvider),
}

impl AnyProvider {
    /// Platform this provider serves.
    pub fn platform(&self) -> Platform {
        match self {
            Self::Apns(_) => Platform::Apns,
            Self::Gcm(_) => Platform::Gcm,
        }
    }
}

impl Provider for AnyProvider {
    async fn push_notification(
        &self,
        notification: &Notification,
        device_token: DeviceToken,
    ) -> Result<DeliveryResult, Error> {
        match self {
            Self::Apns(provider) => provider.push_notification(notification, device_token).await,
            Self::Gcm(provider) => provider.push_notification(notification, device_token).await,
        }
    }
}

impl From<ApnsProvider> for AnyProvider {
    fn from(provider: ApnsProvider) -> Self {
        Self::Apns(provider)
    }
}

impl From<GcmProvider> for AnyProvider {
    fn from(provider: GcmProvider) -> Self {
        Self::Gcm(provider)
    }
}
