//! Provider trait.

use crate::{DeliveryResult, DeviceToken, Error, Notification};

/// A push backend bound to one long-lived gateway connection.
///
/// Calls are independent and may run concurrently on the same instance.
/// Recipient-level failures resolve into [`DeliveryResult::failed`]; only
/// transport-level faults return `Err`.
#[trait_variant::make(Send)]
pub trait Provider: Send + Sync {
    /// Push a notification to one or more devices.
    async fn push_notification(
        &self,
        notification: &Notification,
        device_token: DeviceToken,
    ) -> Result<DeliveryResult, Error>;
}
