//! Login completion: runs once after the OAuth2 handshake succeeds.

mod core;
mod types;

pub use self::core::{LoginCompletionHandler, internal_token_for};
pub use self::types::{LoginRedirect, OAuth2Login};
