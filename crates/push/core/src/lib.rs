//! Push Core Types
//!
//! Provider-agnostic notification model, recipient tokens, delivery results
//! and the `Provider` contract shared by every push backend.

mod error;
mod notification;
mod provider;
mod result;
mod token;

pub use error::*;
pub use notification::*;
pub use provider::*;
pub use result::*;
pub use token::*;
