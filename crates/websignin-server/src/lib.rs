pub mod config;
pub mod error;
pub mod handlers;
pub mod observability;
pub mod server;

pub use config::AppConfig;
pub use error::RpcError;
pub use server::{ProviderServer, ServerBuilder, build_app, provider_from_config};
