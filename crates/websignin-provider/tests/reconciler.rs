//! Lifecycle tests for the web sign-in resource against an in-memory directory.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use websignin_core::{PropertySnapshot, ProviderError};
use websignin_directory::{
    ApplicationsClient, DirectoryRequest, DirectoryTransport, ExistencePoller, InMemoryDirectory,
    InvokeOutcome, Method, PollSettings,
};
use websignin_provider::Provider;
use websignin_provider::protocol::{
    CreateRequest, DeleteRequest, DiffChanges, DiffRequest, UpdateRequest,
};

const URN: &str = "urn:pulumi:dev::site::knapcode:index:PrepareAppForWebSignIn::signin";

fn poller(max_attempts: u32) -> ExistencePoller {
    ExistencePoller::new(PollSettings {
        max_attempts,
        interval: Duration::ZERO,
    })
}

fn setup() -> (Arc<InMemoryDirectory>, Provider) {
    let directory = Arc::new(InMemoryDirectory::new());
    let provider = Provider::new(ApplicationsClient::new(directory.clone()), poller(5));
    (directory, provider)
}

fn props(object_id: &str, host_name: &str) -> PropertySnapshot {
    PropertySnapshot::try_from(json!({"objectId": object_id, "hostName": host_name})).unwrap()
}

fn create(properties: PropertySnapshot) -> CreateRequest {
    CreateRequest {
        urn: URN.into(),
        properties,
        preview: false,
    }
}

fn update(olds: PropertySnapshot, news: PropertySnapshot) -> UpdateRequest {
    UpdateRequest {
        urn: URN.into(),
        id: "ignored".into(),
        olds,
        news,
        preview: false,
    }
}

fn delete(properties: PropertySnapshot) -> DeleteRequest {
    DeleteRequest {
        urn: URN.into(),
        id: "ignored".into(),
        properties,
    }
}

/// Transport answering from a fixed script, for races the in-memory
/// directory cannot express.
struct ScriptedTransport {
    outcomes: Mutex<VecDeque<InvokeOutcome>>,
    methods: Mutex<Vec<Method>>,
}

impl ScriptedTransport {
    fn new(outcomes: impl IntoIterator<Item = InvokeOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            methods: Mutex::new(Vec::new()),
        }
    }

    fn methods(&self) -> Vec<Method> {
        self.methods.lock().unwrap().clone()
    }
}

#[async_trait]
impl DirectoryTransport for ScriptedTransport {
    async fn invoke(&self, request: &DirectoryRequest) -> InvokeOutcome {
        self.methods.lock().unwrap().push(request.method);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .expect("script exhausted")
    }

    fn tool_name(&self) -> &str {
        "scripted"
    }
}

fn ok() -> InvokeOutcome {
    InvokeOutcome::Success {
        stdout: String::new(),
    }
}

fn not_found() -> InvokeOutcome {
    InvokeOutcome::NotFound {
        diagnostics: "Response status: 404".into(),
    }
}

#[tokio::test]
async fn test_create_configures_existing_application() {
    let (directory, provider) = setup();
    directory.insert("abc-123");

    let response = provider
        .create(create(props("abc-123", "app.example.com")))
        .await
        .unwrap();

    assert_eq!(response.id, "abc-123");
    assert_eq!(response.properties, props("abc-123", "app.example.com"));
    assert_eq!(directory.methods(), vec![Method::Get, Method::Patch]);
    assert_eq!(
        directory.configuration("abc-123"),
        Some(json!({
            "api": {"requestedAccessTokenVersion": 2},
            "signInAudience": "AzureADandPersonalMicrosoftAccount",
            "web": {
                "homePageUrl": "https://app.example.com",
                "redirectUris": ["https://app.example.com/signin-oidc"],
                "logoutUrl": "https://app.example.com/signout-oidc"
            }
        }))
    );
}

#[tokio::test]
async fn test_create_waits_for_propagation() {
    let (directory, provider) = setup();
    directory.insert_after("abc-123", 3);

    provider
        .create(create(props("abc-123", "app.example.com")))
        .await
        .unwrap();

    assert_eq!(
        directory.methods(),
        vec![Method::Get, Method::Get, Method::Get, Method::Get, Method::Patch]
    );
}

#[tokio::test]
async fn test_create_times_out_without_patch() {
    let (directory, provider) = setup();

    let err = provider
        .create(create(props("missing", "app.example.com")))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProviderError::Timeout {
            expected_present: true,
            attempts: 5,
            ..
        }
    ));
    assert!(!directory.methods().contains(&Method::Patch));
}

#[tokio::test]
async fn test_create_missing_host_name_makes_no_calls() {
    let (directory, provider) = setup();
    directory.insert("abc-123");

    let properties = PropertySnapshot::try_from(json!({"objectId": "abc-123"})).unwrap();
    let err = provider.create(create(properties)).await.unwrap_err();

    assert!(matches!(err, ProviderError::Validation { ref property, .. } if property == "hostName"));
    assert!(directory.calls().is_empty());
}

#[tokio::test]
async fn test_create_preview_makes_no_calls() {
    let (directory, provider) = setup();

    let response = provider
        .create(CreateRequest {
            preview: true,
            ..create(props("abc-123", "app.example.com"))
        })
        .await
        .unwrap();

    assert_eq!(response.id, "abc-123");
    assert!(directory.calls().is_empty());
}

#[tokio::test]
async fn test_create_patch_failure_surfaces_diagnostics() {
    let (directory, provider) = setup();
    directory.insert("abc-123");
    directory.fail_with(Method::Patch, "ERROR: Forbidden(Authorization_RequestDenied)");

    let err = provider
        .create(create(props("abc-123", "app.example.com")))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::ExternalTool { .. }));
    assert!(err.to_string().contains("Authorization_RequestDenied"));
}

#[tokio::test]
async fn test_diff_classifies_fields() {
    let (directory, provider) = setup();

    let response = provider
        .diff(DiffRequest {
            urn: URN.into(),
            id: "a".into(),
            olds: props("a", "h1"),
            news: props("a", "h2"),
        })
        .await
        .unwrap();
    assert_eq!(response.changes, DiffChanges::DiffSome);
    assert_eq!(response.diffs, vec!["hostName"]);
    assert!(response.replaces.is_empty());

    let response = provider
        .diff(DiffRequest {
            urn: URN.into(),
            id: "a".into(),
            olds: props("a", "h1"),
            news: props("a", "h1"),
        })
        .await
        .unwrap();
    assert_eq!(response.changes, DiffChanges::DiffNone);
    assert!(response.diffs.is_empty());

    assert!(directory.calls().is_empty());
}

#[tokio::test]
async fn test_update_object_id_change_replaces() {
    let (directory, provider) = setup();
    directory.insert("old-id");
    directory.insert("new-id");

    let response = provider
        .update(update(props("old-id", "h1"), props("new-id", "h1")))
        .await
        .unwrap();

    assert_eq!(response.properties, props("new-id", "h1"));
    let calls: Vec<_> = directory
        .calls()
        .into_iter()
        .map(|c| (c.method, c.object_id))
        .collect();
    assert_eq!(
        calls,
        vec![
            (Method::Get, "old-id".to_string()),
            (Method::Delete, "old-id".to_string()),
            (Method::Get, "old-id".to_string()),
            (Method::Get, "new-id".to_string()),
            (Method::Patch, "new-id".to_string()),
        ]
    );
    assert!(!directory.contains("old-id"));
    assert!(directory.configuration("new-id").is_some());
}

#[tokio::test]
async fn test_update_waits_for_old_application_removal() {
    let (directory, provider) = setup();
    directory.insert("old-id");
    directory.set_removal_lag("old-id", 2);
    directory.insert("new-id");

    provider
        .update(update(props("old-id", "h1"), props("new-id", "h1")))
        .await
        .unwrap();

    assert_eq!(
        directory.methods(),
        vec![
            Method::Get,
            Method::Delete,
            Method::Get,
            Method::Get,
            Method::Get,
            Method::Get,
            Method::Patch,
        ]
    );
}

#[tokio::test]
async fn test_update_host_name_only_patches() {
    let (directory, provider) = setup();
    directory.insert("abc-123");

    let response = provider
        .update(update(
            props("abc-123", "old.example.com"),
            props("abc-123", "new.example.com"),
        ))
        .await
        .unwrap();

    assert_eq!(response.properties, props("abc-123", "new.example.com"));
    assert_eq!(directory.methods(), vec![Method::Patch]);
    assert_eq!(
        directory.configuration("abc-123").unwrap()["web"]["homePageUrl"],
        "https://new.example.com"
    );
}

#[tokio::test]
async fn test_update_without_changes_makes_no_calls() {
    let (directory, provider) = setup();
    directory.insert("abc-123");

    let response = provider
        .update(update(props("abc-123", "h1"), props("abc-123", "h1")))
        .await
        .unwrap();

    assert_eq!(response.properties, props("abc-123", "h1"));
    assert!(directory.calls().is_empty());
}

#[tokio::test]
async fn test_update_preview_makes_no_calls() {
    let (directory, provider) = setup();

    provider
        .update(UpdateRequest {
            preview: true,
            ..update(props("a", "h1"), props("b", "h2"))
        })
        .await
        .unwrap();

    assert!(directory.calls().is_empty());
}

#[tokio::test]
async fn test_update_rejects_invalid_olds() {
    let (directory, provider) = setup();

    let olds = PropertySnapshot::try_from(json!({"hostName": "h1"})).unwrap();
    let err = provider
        .update(update(olds, props("a", "h1")))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Validation { ref property, .. } if property == "objectId"));
    assert!(directory.calls().is_empty());
}

#[tokio::test]
async fn test_delete_removes_and_waits() {
    let (directory, provider) = setup();
    directory.insert("abc-123");

    provider
        .delete(delete(props("abc-123", "h1")))
        .await
        .unwrap();

    assert_eq!(
        directory.methods(),
        vec![Method::Get, Method::Delete, Method::Get]
    );
    assert!(!directory.contains("abc-123"));
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let (directory, provider) = setup();

    provider
        .delete(delete(props("never-existed", "h1")))
        .await
        .unwrap();

    assert_eq!(directory.methods(), vec![Method::Get]);
}

#[tokio::test]
async fn test_delete_tolerates_concurrent_removal() {
    let transport = Arc::new(ScriptedTransport::new([ok(), not_found(), not_found()]));
    let provider = Provider::new(ApplicationsClient::new(transport.clone()), poller(5));

    provider
        .delete(delete(props("abc-123", "h1")))
        .await
        .unwrap();

    assert_eq!(
        transport.methods(),
        vec![Method::Get, Method::Delete, Method::Get]
    );
}

#[tokio::test]
async fn test_delete_failure_is_reported() {
    let (directory, provider) = setup();
    directory.insert("abc-123");
    directory.fail_with(Method::Delete, "ERROR: Forbidden");

    let err = provider
        .delete(delete(props("abc-123", "h1")))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "in-memory directory failed: ERROR: Forbidden");
    assert!(directory.contains("abc-123"));
}

#[tokio::test]
async fn test_delete_failure_mentioning_not_found_is_not_absence() {
    let (directory, provider) = setup();
    directory.insert("abc-123");
    let diagnostics = "ERROR: Subscription 'sub-1' not found. Check the spelling and casing and try again.";
    directory.fail_with(Method::Delete, diagnostics);

    let err = provider
        .delete(delete(props("abc-123", "h1")))
        .await
        .unwrap_err();

    match err {
        ProviderError::ExternalTool { diagnostics: text, .. } => assert_eq!(text, diagnostics),
        other => panic!("expected external tool error, got {other:?}"),
    }
    assert_eq!(directory.methods(), vec![Method::Get, Method::Delete]);
}

#[tokio::test]
async fn test_delete_404_is_taken_as_already_gone() {
    let (directory, provider) = setup();
    directory.insert("abc-123");
    directory.fail_with(
        Method::Delete,
        "DEBUG: Response status: 404\nERROR: Not Found({\"error\":{\"code\":\"Request_ResourceNotFound\"}})",
    );

    // The injected 404 leaves the object in place, so the absence poll gives up.
    let err = provider
        .delete(delete(props("abc-123", "h1")))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProviderError::Timeout {
            expected_present: false,
            ..
        }
    ));
    let methods = directory.methods();
    assert_eq!(methods[..2], [Method::Get, Method::Delete]);
    assert_eq!(methods.len(), 2 + 5);
}

#[tokio::test]
async fn test_delete_times_out_when_application_lingers() {
    let (directory, provider) = setup();
    directory.insert("abc-123");
    directory.set_removal_lag("abc-123", 100);

    let err = provider
        .delete(delete(props("abc-123", "h1")))
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Application with object ID abc-123 did not become absent after 5 attempts"
    );
}

#[tokio::test]
async fn test_unknown_type_makes_no_calls() {
    let (directory, provider) = setup();
    directory.insert("abc-123");

    let err = provider
        .create(CreateRequest {
            urn: "urn:pulumi:dev::site::acme:index:Widget::w".into(),
            ..create(props("abc-123", "h1"))
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Create: unknown resource type 'acme:index:Widget'");
    assert!(directory.calls().is_empty());
}

#[tokio::test]
async fn test_create_with_unknown_input_needs_preview() {
    let (directory, provider) = setup();
    let properties = props("abc-123", websignin_core::UNKNOWN_VALUE);

    let response = provider
        .create(CreateRequest {
            preview: true,
            ..create(properties.clone())
        })
        .await
        .unwrap();
    assert_eq!(response.id, "abc-123");

    let err = provider.create(create(properties)).await.unwrap_err();
    assert!(matches!(err, ProviderError::Validation { ref property, .. } if property == "hostName"));
    assert!(directory.calls().is_empty());
}
