use std::sync::LazyLock;

use regex::Regex;

use crate::transport::{InvokeOutcome, Method};

// Graph reports a missing object as `Request_ResourceNotFound`; the CLI wraps
// it as `Not Found(...)` and, with --verbose, logs `Response status: 404`.
static NOT_FOUND_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\brequest_resourcenotfound\b").expect("not-found code is a valid regex")
});

static NOT_FOUND_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bNot Found\(").expect("not-found prefix is a valid regex")
});

static STATUS_404: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)response status:\s*404\b").expect("status marker is a valid regex")
});

/// Whether the diagnostics of a failed `method` call mean the object is absent.
///
/// Reads key on the error code or the CLI's `Not Found(` wrapper. Deletes run
/// verbose and need both the error code and the 404 status line, so a delete
/// failing for any other reason is never taken for an absent object.
pub fn is_not_found(method: Method, diagnostics: &str) -> bool {
    match method {
        Method::Delete => {
            NOT_FOUND_CODE.is_match(diagnostics) && STATUS_404.is_match(diagnostics)
        }
        Method::Get | Method::Patch => {
            NOT_FOUND_CODE.is_match(diagnostics) || NOT_FOUND_PREFIX.is_match(diagnostics)
        }
    }
}

/// Classify the diagnostics of a failed call.
pub fn classify_failure(method: Method, diagnostics: impl Into<String>) -> InvokeOutcome {
    let diagnostics = diagnostics.into();
    if is_not_found(method, &diagnostics) {
        InvokeOutcome::NotFound { diagnostics }
    } else {
        InvokeOutcome::Failed { diagnostics }
    }
}
