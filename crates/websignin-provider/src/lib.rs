//! Web sign-in application provider.
//!
//! [`Provider`] implements the engine's verb set. Each resource verb resolves
//! the resource kind from the request URN and delegates to that kind's
//! [`ResourceHandler`]; today the only kind is
//! [`ResourceKind::PrepareAppForWebSignIn`](websignin_core::ResourceKind).

pub mod handler;
pub mod protocol;
pub mod provider;
pub mod web_sign_in;

pub use handler::{Created, ResourceHandler};
pub use provider::{PROVIDER_NAME, Provider};
pub use web_sign_in::WebSignInHandler;
