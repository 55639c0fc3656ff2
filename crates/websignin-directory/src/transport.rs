//! Transport abstraction for the identity directory API.
//!
//! A transport executes one [`DirectoryRequest`] and classifies the result as
//! success, not-found, or any other failure. Classifiable failures are never
//! returned as errors, so callers can branch on the outcome directly.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CONTENT_TYPE_JSON: (&str, &str) = ("Content-Type", "application/json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryRequest {
    pub method: Method,
    pub uri: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Response projection, e.g. `id` to fetch only the object's ID
    pub query: Option<String>,
    /// Ask the transport for verbose diagnostics (status lines, headers)
    pub verbose: bool,
}

impl DirectoryRequest {
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            headers: Vec::new(),
            body: None,
            query: None,
            verbose: false,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a JSON body; the JSON content type header is added if missing.
    pub fn with_json_body(mut self, body: Value) -> Self {
        if !self.has_header(CONTENT_TYPE_JSON.0) {
            self = self.with_header(CONTENT_TYPE_JSON.0, CONTENT_TYPE_JSON.1);
        }
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
    }
}

/// Classified result of a directory call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvokeOutcome {
    Success { stdout: String },
    NotFound { diagnostics: String },
    Failed { diagnostics: String },
}

impl InvokeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[async_trait]
pub trait DirectoryTransport: Send + Sync {
    async fn invoke(&self, request: &DirectoryRequest) -> InvokeOutcome;

    /// Name used in logs and in error messages for failed calls
    fn tool_name(&self) -> &str;
}

/// Type alias for a shareable transport
pub type DynTransport = Arc<dyn DirectoryTransport>;
