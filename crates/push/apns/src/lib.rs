//! APNs Push Provider
//!
//! Certificate/token authenticated push delivery for iOS and macOS devices.

mod a2_transport;
mod notification;
mod provider;
mod settings;
mod transport;

pub use a2_transport::A2Transport;
pub use notification::*;
pub use provider::*;
pub use settings::*;
pub use transport::*;

/// Provider name used in errors and logs.
pub const PROVIDER: &str = "apns";
