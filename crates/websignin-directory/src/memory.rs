//! In-memory identity directory.
//!
//! Implements [`DirectoryTransport`] over a concurrent map of application
//! objects, for local runs without a directory tenant and for tests. It can
//! simulate the directory's eventual consistency: an object may stay
//! invisible for a number of reads after it is inserted, and stay visible for
//! a number of reads after it is deleted. Every call is recorded.

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use serde_json::Value;

use crate::classify::classify_failure;
use crate::transport::{DirectoryRequest, DirectoryTransport, InvokeOutcome, Method};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub object_id: String,
    pub body: Option<Value>,
}

#[derive(Debug, Default)]
struct ApplicationEntry {
    /// Reads still answering not-found before the object shows up
    hidden_reads: u32,
    /// Reads still answering found after the object was deleted
    removal_lag: u32,
    deleted: bool,
    configuration: Option<Value>,
}

#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    applications: DashMap<String, ApplicationEntry>,
    failures: DashMap<Method, String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an application that is visible immediately
    pub fn insert(&self, object_id: impl Into<String>) {
        self.insert_after(object_id, 0);
    }

    /// Add an application that answers not-found for the next `reads` GETs
    pub fn insert_after(&self, object_id: impl Into<String>, reads: u32) {
        self.applications.insert(
            object_id.into(),
            ApplicationEntry {
                hidden_reads: reads,
                ..ApplicationEntry::default()
            },
        );
    }

    /// Keep a deleted application visible for `reads` GETs after its DELETE
    pub fn set_removal_lag(&self, object_id: &str, reads: u32) {
        if let Some(mut entry) = self.applications.get_mut(object_id) {
            entry.removal_lag = reads;
        }
    }

    /// Make every call with `method` fail with `diagnostics`.
    ///
    /// Diagnostics are classified like real tool output, so a 404-shaped text
    /// yields a not-found outcome.
    pub fn fail_with(&self, method: Method, diagnostics: impl Into<String>) {
        self.failures.insert(method, diagnostics.into());
    }

    pub fn clear_failures(&self) {
        self.failures.clear();
    }

    /// Whether a read right now would find the application
    pub fn contains(&self, object_id: &str) -> bool {
        self.applications
            .get(object_id)
            .is_some_and(|e| e.hidden_reads == 0 && (!e.deleted || e.removal_lag > 0))
    }

    /// Last configuration patched onto the application
    pub fn configuration(&self, object_id: &str) -> Option<Value> {
        self.applications
            .get(object_id)
            .and_then(|e| e.configuration.clone())
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn methods(&self) -> Vec<Method> {
        self.calls.lock().iter().map(|c| c.method).collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn read(&self, object_id: &str) -> InvokeOutcome {
        let Some(mut entry) = self.applications.get_mut(object_id) else {
            return not_found(Method::Get, object_id);
        };

        if entry.deleted {
            if entry.removal_lag == 0 {
                drop(entry);
                self.applications.remove(object_id);
                return not_found(Method::Get, object_id);
            }
            entry.removal_lag -= 1;
        } else if entry.hidden_reads > 0 {
            entry.hidden_reads -= 1;
            return not_found(Method::Get, object_id);
        }

        InvokeOutcome::Success {
            stdout: format!("\"{object_id}\"\n"),
        }
    }

    fn write(&self, object_id: &str, body: Option<&Value>) -> InvokeOutcome {
        let Some(mut entry) = self.applications.get_mut(object_id) else {
            return not_found(Method::Patch, object_id);
        };
        if entry.deleted || entry.hidden_reads > 0 {
            return not_found(Method::Patch, object_id);
        }
        entry.configuration = body.cloned();
        InvokeOutcome::Success {
            stdout: String::new(),
        }
    }

    fn remove(&self, object_id: &str) -> InvokeOutcome {
        let Some(mut entry) = self.applications.get_mut(object_id) else {
            return not_found(Method::Delete, object_id);
        };
        if entry.deleted || entry.hidden_reads > 0 {
            return not_found(Method::Delete, object_id);
        }
        if entry.removal_lag == 0 {
            drop(entry);
            self.applications.remove(object_id);
        } else {
            entry.deleted = true;
        }
        InvokeOutcome::Success {
            stdout: String::new(),
        }
    }
}

/// Failure text the CLI produces for a missing object. Mutating calls run
/// verbose and also log the response status.
fn not_found(method: Method, object_id: &str) -> InvokeOutcome {
    let status = match method {
        Method::Get => "",
        Method::Patch | Method::Delete => "DEBUG: Response status: 404\n",
    };
    let diagnostics = format!(
        "{status}ERROR: Not Found({{\"error\":{{\"code\":\"Request_ResourceNotFound\",\
         \"message\":\"Resource '{object_id}' does not exist or one of its queried \
         reference-property objects are not present.\"}}}})"
    );
    classify_failure(method, diagnostics)
}

fn object_id_of(uri: &str) -> &str {
    let path = uri.split(['?', '#']).next().unwrap_or(uri);
    path.trim_end_matches('/').rsplit('/').next().unwrap_or(path)
}

#[async_trait]
impl DirectoryTransport for InMemoryDirectory {
    async fn invoke(&self, request: &DirectoryRequest) -> InvokeOutcome {
        let object_id = object_id_of(&request.uri);
        self.calls.lock().push(RecordedCall {
            method: request.method,
            object_id: object_id.to_string(),
            body: request.body.clone(),
        });

        if let Some(diagnostics) = self.failures.get(&request.method) {
            return classify_failure(request.method, diagnostics.value().clone());
        }

        let outcome = match request.method {
            Method::Get => self.read(object_id),
            Method::Patch => self.write(object_id, request.body.as_ref()),
            Method::Delete => self.remove(object_id),
        };
        tracing::trace!(method = %request.method, object_id, ?outcome, "In-memory directory call");
        outcome
    }

    fn tool_name(&self) -> &str {
        "in-memory directory"
    }
}
