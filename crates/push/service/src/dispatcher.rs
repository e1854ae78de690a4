//! Platform dispatch.

use std::collections::HashMap;

use push_apns::ApnsProvider;
use push_core::{DeliveryResult, DeviceToken, Error, Notification, Provider};
use push_gcm::GcmProvider;

use crate::{AnyProvider, Platform, PushSettings};

/// Routes notifications to the provider registered for each platform.
pub struct Dispatcher<P = AnyProvider> {
    providers: HashMap<Platform, P>,
}

impl Dispatcher<AnyProvider> {
    /// Construct every provider present in `settings`.
    ///
    /// Each provider opens its connection here and keeps it for the
    /// dispatcher's lifetime.
    pub fn from_settings(settings: &PushSettings) -> Result<Self, Error> {
        let mut dispatcher = Self::new();

        if let Some(apns) = &settings.apns {
            dispatcher = dispatcher.with_provider(Platform::Apns, ApnsProvider::new(apns)?.into());
        }
        if let Some(gcm) = &settings.gcm {
            dispatcher = dispatcher.with_provider(Platform::Gcm, GcmProvider::new(gcm)?.into());
        }

        tracing::info!(platforms = ?dispatcher.platforms(), "push dispatcher ready");
        Ok(dispatcher)
    }
}

impl<P> Dispatcher<P> {
    /// Create a dispatcher with no providers.
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Register a provider, replacing any previous one for the platform.
    pub fn with_provider(mut self, platform: Platform, provider: P) -> Self {
        self.providers.insert(platform, provider);
        self
    }

    /// Provider registered for a platform.
    pub fn provider(&self, platform: Platform) -> Option<&P> {
        self.providers.get(&platform)
    }

    /// Platforms with a registered provider, in a stable order.
    pub fn platforms(&self) -> Vec<Platform> {
        let mut platforms: Vec<_> = self.providers.keys().copied().collect();
        platforms.sort_by_key(|p| p.as_str());
        platforms
    }
}

impl<P> Default for Dispatcher<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Provider> Dispatcher<P> {
    /// Push to devices of the named platform.
    pub async fn push(
        &self,
        platform: &str,
        notification: &Notification,
        device_token: DeviceToken,
    ) -> Result<DeliveryResult, Error> {
        let platform: Platform = platform.parse()?;
        self.push_to(platform, notification, device_token).await
    }

    /// Push to devices of one platform.
    pub async fn push_to(
        &self,
        platform: Platform,
        notification: &Notification,
        device_token: DeviceToken,
    ) -> Result<DeliveryResult, Error> {
        let provider = self
            .providers
            .get(&platform)
            .ok_or_else(|| Error::UnknownPlatform(platform.to_string()))?;

        provider.push_notification(notification, device_token).await
    }

    /// Push one notification to several platforms concurrently.
    ///
    /// Every target gets its own outcome; one platform failing does not
    /// affect the others.
    pub async fn push_many(
        &self,
        notification: &Notification,
        targets: Vec<(Platform, DeviceToken)>,
    ) -> Vec<(Platform, Result<DeliveryResult, Error>)> {
        let pushes = targets.into_iter().map(|(platform, tokens)| async move {
            let outcome = self.push_to(platform, notification, tokens).await;
            if let Err(e) = &outcome {
                tracing::warn!(%platform, error = %e, "push failed");
            }
            (platform, outcome)
        });

        futures::future::join_all(pushes).await
    }
}
