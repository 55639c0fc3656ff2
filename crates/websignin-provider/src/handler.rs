use async_trait::async_trait;
use websignin_core::{DiffResult, PropertySnapshot, ResourceKind, Result};

use crate::protocol::CheckResponse;

/// Result of a successful Create
#[derive(Debug, Clone, PartialEq)]
pub struct Created {
    pub id: String,
    pub outputs: PropertySnapshot,
}

/// Lifecycle operations one resource kind implements.
///
/// The provider resolves a [`ResourceKind`] from the request URN and hands
/// the request to that kind's handler.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    fn kind(&self) -> ResourceKind;

    /// Validate inputs. Inputs are echoed unchanged; no defaults are applied.
    fn check(&self, _olds: &PropertySnapshot, news: PropertySnapshot) -> Result<CheckResponse> {
        Ok(CheckResponse {
            inputs: news,
            failures: Vec::new(),
        })
    }

    fn diff(&self, olds: &PropertySnapshot, news: &PropertySnapshot) -> Result<DiffResult>;

    /// Bring the external object in line with `news`. With `preview` set,
    /// validate and report the outputs without touching the directory.
    async fn create(&self, news: &PropertySnapshot, preview: bool) -> Result<Created>;

    async fn update(
        &self,
        olds: &PropertySnapshot,
        news: &PropertySnapshot,
        preview: bool,
    ) -> Result<PropertySnapshot>;

    async fn delete(&self, properties: &PropertySnapshot) -> Result<()>;
}
