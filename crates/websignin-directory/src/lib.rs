//! Identity directory access for the web sign-in provider.
//!
//! This crate isolates everything that talks to the directory:
//!
//! - [`DirectoryTransport`]: one request in, a classified outcome out
//! - [`AzCliTransport`]: the `az rest` subprocess transport
//! - [`InMemoryDirectory`]: a local transport with simulated propagation delay
//! - [`ApplicationsClient`]: typed GET/PATCH/DELETE on application objects
//! - [`ExistencePoller`]: bounded waiting for a write to become visible
//!
//! # Example
//!
//! ```ignore
//! use websignin_directory::{ApplicationsClient, ExistencePoller, create_transport, DirectoryBackend};
//!
//! let client = ApplicationsClient::new(create_transport(DirectoryBackend::AzCli, "az"));
//! ExistencePoller::default()
//!     .wait_for_existence(&client, "abc-123", true)
//!     .await?;
//! ```

pub mod az_cli;
pub mod classify;
pub mod client;
pub mod memory;
pub mod model;
pub mod poller;
pub mod transport;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use az_cli::{AzCliTransport, DEFAULT_PROGRAM};
pub use client::{ApplicationsClient, DEFAULT_API_BASE_URL, DeleteOutcome};
pub use memory::{InMemoryDirectory, RecordedCall};
pub use model::ApplicationPatch;
pub use poller::{ExistencePoller, PollSettings};
pub use transport::{DirectoryRequest, DirectoryTransport, DynTransport, InvokeOutcome, Method};

/// Supported directory backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DirectoryBackend {
    /// `az rest` against the live directory
    #[default]
    AzCli,
    /// Process-local directory with no external calls
    Memory,
}

/// Create a transport for the configured backend.
///
/// `program` is only used by the CLI backend.
pub fn create_transport(backend: DirectoryBackend, program: &str) -> DynTransport {
    match backend {
        DirectoryBackend::AzCli => Arc::new(AzCliTransport::new(program)),
        DirectoryBackend::Memory => Arc::new(InMemoryDirectory::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_names() {
        let backend: DirectoryBackend = serde_json::from_str("\"az-cli\"").unwrap();
        assert_eq!(backend, DirectoryBackend::AzCli);
        let backend: DirectoryBackend = serde_json::from_str("\"memory\"").unwrap();
        assert_eq!(backend, DirectoryBackend::Memory);
        assert_eq!(DirectoryBackend::default(), DirectoryBackend::AzCli);
    }

    #[test]
    fn test_create_transport() {
        assert_eq!(create_transport(DirectoryBackend::AzCli, "az").tool_name(), "az");
        assert_eq!(
            create_transport(DirectoryBackend::Memory, "az").tool_name(),
            "in-memory directory"
        );
    }
}
