//! APNs transport trait.

use push_core::{DeliveryResult, Error};

use crate::ApnsNotification;

/// Connection to an APNs gateway.
///
/// Implementations own the connection and multiplex concurrent sends over
/// it. Every device must come back in exactly one of `sent` or `failed`.
#[trait_variant::make(Send)]
pub trait ApnsTransport: Send + Sync {
    /// Send one notification to a batch of devices.
    async fn send(
        &self,
        notification: &ApnsNotification,
        devices: &[String],
    ) -> Result<DeliveryResult, Error>;
}
