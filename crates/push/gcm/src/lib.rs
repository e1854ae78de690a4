//! GCM Push Provider
//!
//! Server-key authenticated batch delivery for Android devices.

mod http;
mod message;
mod provider;
mod settings;
mod transport;

pub use http::HttpSender;
pub use message::*;
pub use provider::*;
pub use settings::*;
pub use transport::*;

/// Provider name used in errors and logs.
pub const PROVIDER: &str = "gcm";
