//! Directory transport that shells out to `az rest`.
//!
//! The CLI carries the operator's authenticated session, so no credentials
//! are handled here. Every invocation logs its argument vector, stdout and
//! stderr at trace level, whatever the outcome.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::classify::classify_failure;
use crate::transport::{DirectoryRequest, DirectoryTransport, InvokeOutcome};

pub const DEFAULT_PROGRAM: &str = "az";

#[derive(Debug, Clone)]
pub struct AzCliTransport {
    program: String,
}

impl AzCliTransport {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

}

/// Build the `az rest` argument vector for a request.
pub fn rest_args(request: &DirectoryRequest) -> Vec<String> {
    let mut args = vec![
        "rest".to_string(),
        "--method".to_string(),
        request.method.as_str().to_string(),
    ];

    if !request.headers.is_empty() {
        args.push("--headers".to_string());
        args.extend(
            request
                .headers
                .iter()
                .map(|(name, value)| format!("{name}={value}")),
        );
    }

    args.push("--uri".to_string());
    args.push(request.uri.clone());

    if let Some(body) = &request.body {
        args.push("--body".to_string());
        args.push(body.to_string());
    }

    if let Some(query) = &request.query {
        args.push("--query".to_string());
        args.push(query.clone());
    }

    if request.verbose {
        args.push("--verbose".to_string());
    }

    args
}

#[async_trait]
impl DirectoryTransport for AzCliTransport {
    async fn invoke(&self, request: &DirectoryRequest) -> InvokeOutcome {
        let args = rest_args(request);
        tracing::trace!(program = %self.program, ?args, "Executing command");

        let output = match Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                tracing::trace!(program = %self.program, error = %e, "Command failed to start");
                return InvokeOutcome::Failed {
                    diagnostics: format!("{} failed to start: {e}", self.program),
                };
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        tracing::trace!(%stdout, "stdout");
        tracing::trace!(%stderr, "stderr");

        if output.status.success() {
            InvokeOutcome::Success { stdout }
        } else {
            tracing::trace!(status = %output.status, "Command exited with failure");
            classify_failure(
                request.method,
                format!(
                    "{} failed with {}\n{}",
                    self.program, output.status, stderr
                ),
            )
        }
    }

    fn tool_name(&self) -> &str {
        &self.program
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Method;
    use serde_json::json;

    #[test]
    fn test_get_args_with_projection() {
        let request = DirectoryRequest::new(
            Method::Get,
            "https://graph.microsoft.com/v1.0/applications/abc-123",
        )
        .with_query("id");
        assert_eq!(
            rest_args(&request),
            vec![
                "rest",
                "--method",
                "GET",
                "--uri",
                "https://graph.microsoft.com/v1.0/applications/abc-123",
                "--query",
                "id",
            ]
        );
    }

    #[test]
    fn test_patch_args_with_body() {
        let request = DirectoryRequest::new(
            Method::Patch,
            "https://graph.microsoft.com/v1.0/applications/abc-123",
        )
        .with_json_body(json!({"signInAudience": "AzureADMyOrg"}))
        .verbose();
        assert_eq!(
            rest_args(&request),
            vec![
                "rest",
                "--method",
                "PATCH",
                "--headers",
                "Content-Type=application/json",
                "--uri",
                "https://graph.microsoft.com/v1.0/applications/abc-123",
                "--body",
                r#"{"signInAudience":"AzureADMyOrg"}"#,
                "--verbose",
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_program_is_failure() {
        let transport = AzCliTransport::new("websignin-definitely-not-installed");
        let outcome = transport
            .invoke(&DirectoryRequest::new(Method::Get, "https://example/applications/a"))
            .await;
        match outcome {
            InvokeOutcome::Failed { diagnostics } => {
                assert!(diagnostics.starts_with("websignin-definitely-not-installed failed to start"))
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[cfg(unix)]
    mod scripted {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use std::path::PathBuf;

        fn script(dir: &tempfile::TempDir, body: &str) -> PathBuf {
            let path = dir.path().join("fake-az");
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn get() -> DirectoryRequest {
            DirectoryRequest::new(Method::Get, "https://example/applications/abc").with_query("id")
        }

        #[tokio::test]
        async fn test_success_captures_stdout() {
            let dir = tempfile::tempdir().unwrap();
            let path = script(&dir, r#"echo '"abc"'"#);
            let transport = AzCliTransport::new(path.to_string_lossy());

            assert_eq!(
                transport.invoke(&get()).await,
                InvokeOutcome::Success {
                    stdout: "\"abc\"\n".to_string()
                }
            );
        }

        #[tokio::test]
        async fn test_not_found_stderr_is_classified() {
            let dir = tempfile::tempdir().unwrap();
            let path = script(
                &dir,
                r#"echo 'ERROR: Not Found({"error":{"code":"Request_ResourceNotFound"}})' >&2; exit 1"#,
            );
            let transport = AzCliTransport::new(path.to_string_lossy());

            assert!(transport.invoke(&get()).await.is_not_found());
        }

        #[tokio::test]
        async fn test_other_stderr_is_failure_with_diagnostics() {
            let dir = tempfile::tempdir().unwrap();
            let path = script(&dir, "echo 'ERROR: Please run az login' >&2; exit 2");
            let transport = AzCliTransport::new(path.to_string_lossy());

            match transport.invoke(&get()).await {
                InvokeOutcome::Failed { diagnostics } => {
                    assert!(diagnostics.contains("Please run az login"));
                }
                other => panic!("expected failure, got {other:?}"),
            }
        }
    }
}
