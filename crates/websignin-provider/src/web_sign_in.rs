//! Reconciliation of the `PrepareAppForWebSignIn` resource.
//!
//! The directory application itself is created elsewhere; this resource
//! claims an existing application and configures its web sign-in settings.
//! All state lives in the directory, so each verb observes it afresh:
//!
//! - Create waits for the object to be visible, then patches it.
//! - Update replaces when the object ID moved and patches otherwise.
//! - Delete removes the object if present and waits until it is gone.

use async_trait::async_trait;
use websignin_core::{
    DiffResult, PropertySnapshot, ResourceKind, Result, WEB_SIGN_IN_FIELDS, WebSignInApp, diff,
};
use websignin_directory::{ApplicationPatch, ApplicationsClient, DeleteOutcome, ExistencePoller};

use crate::handler::{Created, ResourceHandler};

#[derive(Debug, Clone)]
pub struct WebSignInHandler {
    client: ApplicationsClient,
    poller: ExistencePoller,
}

impl WebSignInHandler {
    pub fn new(client: ApplicationsClient, poller: ExistencePoller) -> Self {
        Self { client, poller }
    }

    /// Wait for the application to appear, then configure it.
    async fn claim(&self, app: &WebSignInApp) -> Result<()> {
        self.poller
            .wait_for_existence(&self.client, &app.object_id, true)
            .await?;
        self.configure(app).await
    }

    async fn configure(&self, app: &WebSignInApp) -> Result<()> {
        let patch = ApplicationPatch::web_sign_in(&app.host_name);
        self.client.patch(&app.object_id, &patch).await?;
        tracing::info!(
            object_id = %app.object_id,
            host_name = %app.host_name,
            "Web sign-in configured"
        );
        Ok(())
    }

    async fn release(&self, app: &WebSignInApp) -> Result<()> {
        if !self.client.exists(&app.object_id).await? {
            tracing::info!(object_id = %app.object_id, "Application already absent");
            return Ok(());
        }

        if self.client.delete(&app.object_id).await? == DeleteOutcome::AlreadyGone {
            tracing::debug!(object_id = %app.object_id, "Application vanished before DELETE");
        }

        self.poller
            .wait_for_existence(&self.client, &app.object_id, false)
            .await?;
        tracing::info!(object_id = %app.object_id, "Application deleted");
        Ok(())
    }
}

#[async_trait]
impl ResourceHandler for WebSignInHandler {
    fn kind(&self) -> ResourceKind {
        ResourceKind::PrepareAppForWebSignIn
    }

    fn diff(&self, olds: &PropertySnapshot, news: &PropertySnapshot) -> Result<DiffResult> {
        Ok(diff(&WEB_SIGN_IN_FIELDS, olds, news))
    }

    async fn create(&self, news: &PropertySnapshot, preview: bool) -> Result<Created> {
        let app = WebSignInApp::from_snapshot(news)?;
        if !preview {
            app.ensure_known()?;
            self.claim(&app).await?;
        }
        Ok(Created {
            id: app.object_id.clone(),
            outputs: app.to_snapshot(),
        })
    }

    async fn update(
        &self,
        olds: &PropertySnapshot,
        news: &PropertySnapshot,
        preview: bool,
    ) -> Result<PropertySnapshot> {
        let old = WebSignInApp::from_snapshot(olds)?;
        let new = WebSignInApp::from_snapshot(news)?;
        let changes = self.diff(olds, news)?;

        if preview {
            return Ok(new.to_snapshot());
        }
        new.ensure_known()?;

        if changes.requires_replace() {
            tracing::info!(
                old_object_id = %old.object_id,
                new_object_id = %new.object_id,
                "Object ID changed, replacing"
            );
            self.release(&old).await?;
            self.claim(&new).await?;
        } else if changes.has_changes() {
            self.configure(&new).await?;
        } else {
            tracing::debug!(object_id = %new.object_id, "No tracked changes");
        }

        Ok(new.to_snapshot())
    }

    async fn delete(&self, properties: &PropertySnapshot) -> Result<()> {
        let app = WebSignInApp::from_snapshot(properties)?;
        self.release(&app).await
    }
}
