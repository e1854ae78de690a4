//! GCM transport trait.

use push_core::Error;

use crate::{GcmMessage, GcmResponse};

/// Batch sender bound to one server API key.
#[trait_variant::make(Send)]
pub trait GcmTransport: Send + Sync {
    /// Send one message to a batch of registration ids.
    ///
    /// `results` in the response must be parallel to `registration_ids`.
    /// `retries` is the number of extra attempts the sender may make.
    async fn send(
        &self,
        message: &GcmMessage,
        registration_ids: &[String],
        retries: u32,
    ) -> Result<GcmResponse, Error>;
}
