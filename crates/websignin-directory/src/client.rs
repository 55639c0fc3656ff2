use websignin_core::{ProviderError, Result};

use crate::model::ApplicationPatch;
use crate::transport::{DirectoryRequest, DynTransport, InvokeOutcome, Method};

pub const DEFAULT_API_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// What a DELETE found on the directory side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The object was already gone, e.g. removed outside this provider
    AlreadyGone,
}

/// Typed calls against `/applications/{objectId}`
#[derive(Clone)]
pub struct ApplicationsClient {
    transport: DynTransport,
    base_url: String,
}

impl ApplicationsClient {
    pub fn new(transport: DynTransport) -> Self {
        Self {
            transport,
            base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn application_uri(&self, object_id: &str) -> String {
        format!("{}/applications/{object_id}", self.base_url)
    }

    /// Whether the application object is currently visible in the directory.
    ///
    /// Only not-found means absent; any other failure is returned as an error.
    pub async fn exists(&self, object_id: &str) -> Result<bool> {
        let request =
            DirectoryRequest::new(Method::Get, self.application_uri(object_id)).with_query("id");
        match self.transport.invoke(&request).await {
            InvokeOutcome::Success { .. } => Ok(true),
            InvokeOutcome::NotFound { .. } => Ok(false),
            InvokeOutcome::Failed { diagnostics } => Err(self.tool_error(diagnostics)),
        }
    }

    pub async fn patch(&self, object_id: &str, patch: &ApplicationPatch) -> Result<()> {
        let request = DirectoryRequest::new(Method::Patch, self.application_uri(object_id))
            .with_json_body(serde_json::to_value(patch)?)
            .verbose();
        match self.transport.invoke(&request).await {
            InvokeOutcome::Success { .. } => {
                tracing::debug!(object_id, "Application patched");
                Ok(())
            }
            InvokeOutcome::NotFound { diagnostics } | InvokeOutcome::Failed { diagnostics } => {
                Err(self.tool_error(diagnostics))
            }
        }
    }

    pub async fn delete(&self, object_id: &str) -> Result<DeleteOutcome> {
        let request = DirectoryRequest::new(Method::Delete, self.application_uri(object_id))
            .with_header("Content-Type", "application/json")
            .verbose();
        match self.transport.invoke(&request).await {
            InvokeOutcome::Success { .. } => Ok(DeleteOutcome::Deleted),
            InvokeOutcome::NotFound { .. } => {
                tracing::debug!(object_id, "Application already gone");
                Ok(DeleteOutcome::AlreadyGone)
            }
            InvokeOutcome::Failed { diagnostics } => Err(self.tool_error(diagnostics)),
        }
    }

    fn tool_error(&self, diagnostics: String) -> ProviderError {
        ProviderError::external_tool(self.transport.tool_name(), diagnostics)
    }
}

impl std::fmt::Debug for ApplicationsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationsClient")
            .field("transport", &self.transport.tool_name())
            .field("base_url", &self.base_url)
            .finish()
    }
}
