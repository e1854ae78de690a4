//! Push error types.

/// Boxed error from a transport or credential library.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by providers and the dispatcher.
///
/// Recipient-level delivery failures are never represented here; they are
/// entries in [`crate::DeliveryResult::failed`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Credentials missing, malformed or rejected while opening the connection.
    #[error("failed to open {provider} connection")]
    ConnectionSetup {
        provider: &'static str,
        #[source]
        source: BoxError,
    },

    /// Network or protocol failure before any per-recipient outcome was known.
    #[error("{provider} transport failed")]
    Transport {
        provider: &'static str,
        #[source]
        source: BoxError,
    },

    /// The wire message could not be encoded.
    #[error("failed to encode {provider} payload")]
    Payload {
        provider: &'static str,
        #[source]
        source: BoxError,
    },

    /// No provider is registered for the requested platform.
    #[error("no push provider configured for platform {0:?}")]
    UnknownPlatform(String),
}

impl Error {
    /// Create a connection setup error.
    pub fn connection_setup(provider: &'static str, source: impl Into<BoxError>) -> Self {
        Self::ConnectionSetup {
            provider,
            source: source.into(),
        }
    }

    /// Create a transport error.
    pub fn transport(provider: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Transport {
            provider,
            source: source.into(),
        }
    }

    /// Create a payload encoding error.
    pub fn payload(provider: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Payload {
            provider,
            source: source.into(),
        }
    }

    /// Check if this error happened during a send rather than at setup.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}
