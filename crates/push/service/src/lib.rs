//! Push Service Layer
//!
//! Builds providers from settings and routes notifications by platform.

mod any;
mod config;
mod dispatcher;
mod platform;

pub use any::AnyProvider;
pub use config::*;
pub use dispatcher::Dispatcher;
pub use platform::Platform;
