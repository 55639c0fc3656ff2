//! Provider verbs called by the orchestration engine.

use websignin_core::{ProviderError, ResourceKind, Result, Urn};
use websignin_directory::{ApplicationsClient, ExistencePoller};

use crate::handler::ResourceHandler;
use crate::protocol::{
    CheckRequest, CheckResponse, ConfigureRequest, ConfigureResponse, ConstructRequest,
    ConstructResponse, CreateRequest, CreateResponse, DeleteRequest, DiffRequest, DiffResponse,
    GetSchemaRequest, GetSchemaResponse, InvokeRequest, InvokeResponse, PluginInfo, ReadRequest,
    ReadResponse, UpdateRequest, UpdateResponse,
};
use crate::web_sign_in::WebSignInHandler;

pub const PROVIDER_NAME: &str = "knapcode";

pub struct Provider {
    version: String,
    web_sign_in: WebSignInHandler,
}

impl Provider {
    pub fn new(client: ApplicationsClient, poller: ExistencePoller) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            web_sign_in: WebSignInHandler::new(client, poller),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    fn handler(&self, kind: ResourceKind) -> &dyn ResourceHandler {
        match kind {
            ResourceKind::PrepareAppForWebSignIn => &self.web_sign_in,
        }
    }

    fn resolve(&self, verb: &str, urn: &str) -> Result<&dyn ResourceHandler> {
        let urn = Urn::parse(urn)?;
        let handler = self.handler(ResourceKind::resolve(verb, &urn)?);
        tracing::info!(verb, urn = %urn, kind = %handler.kind(), "Dispatching");
        Ok(handler)
    }

    // Provider-level configuration: there is none.

    pub async fn check_config(&self, request: CheckRequest) -> Result<CheckResponse> {
        Ok(CheckResponse {
            inputs: request.news,
            failures: Vec::new(),
        })
    }

    pub async fn diff_config(&self, _request: DiffRequest) -> Result<DiffResponse> {
        Ok(DiffResponse::default())
    }

    pub async fn configure(&self, _request: ConfigureRequest) -> Result<ConfigureResponse> {
        Ok(ConfigureResponse {
            accept_secrets: false,
            supports_preview: true,
        })
    }

    // Resource lifecycle

    pub async fn check(&self, request: CheckRequest) -> Result<CheckResponse> {
        let handler = self.resolve("Check", &request.urn)?;
        handler.check(&request.olds, request.news)
    }

    pub async fn diff(&self, request: DiffRequest) -> Result<DiffResponse> {
        let handler = self.resolve("Diff", &request.urn)?;
        let result = handler.diff(&request.olds, &request.news)?;
        Ok(DiffResponse::from(&result))
    }

    pub async fn create(&self, request: CreateRequest) -> Result<CreateResponse> {
        let handler = self.resolve("Create", &request.urn)?;
        let created = handler
            .create(&request.properties, request.preview)
            .await?;
        Ok(CreateResponse {
            id: created.id,
            properties: created.outputs,
        })
    }

    pub async fn read(&self, _request: ReadRequest) -> Result<ReadResponse> {
        Err(ProviderError::unsupported("Read"))
    }

    pub async fn update(&self, request: UpdateRequest) -> Result<UpdateResponse> {
        let handler = self.resolve("Update", &request.urn)?;
        let properties = handler
            .update(&request.olds, &request.news, request.preview)
            .await?;
        Ok(UpdateResponse { properties })
    }

    pub async fn delete(&self, request: DeleteRequest) -> Result<()> {
        let handler = self.resolve("Delete", &request.urn)?;
        handler.delete(&request.properties).await
    }

    pub async fn construct(&self, _request: ConstructRequest) -> Result<ConstructResponse> {
        Err(ProviderError::unsupported("Construct"))
    }

    // Functions and plugin metadata

    pub async fn invoke(&self, request: InvokeRequest) -> Result<InvokeResponse> {
        Err(ProviderError::UnknownInvokeToken(request.tok))
    }

    pub async fn get_plugin_info(&self) -> Result<PluginInfo> {
        Ok(PluginInfo {
            version: self.version.clone(),
        })
    }

    pub async fn get_schema(&self, _request: GetSchemaRequest) -> Result<GetSchemaResponse> {
        Ok(GetSchemaResponse::default())
    }

    /// Advisory only: in-flight polls and subprocesses run to completion.
    pub async fn cancel(&self) -> Result<()> {
        tracing::info!("Cancel requested");
        Ok(())
    }
}
