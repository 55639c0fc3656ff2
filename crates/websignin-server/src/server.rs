use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use websignin_directory::{ApplicationsClient, ExistencePoller, create_transport};
use websignin_provider::Provider;

use crate::{config::AppConfig, handlers};

pub struct ProviderServer {
    addr: SocketAddr,
    app: Router,
}

/// Wire the provider to the directory backend selected in `cfg`.
pub fn provider_from_config(cfg: &AppConfig) -> Provider {
    let transport = create_transport(cfg.directory.backend, &cfg.directory.program);
    let client = ApplicationsClient::new(transport).with_base_url(&cfg.directory.api_base_url);
    let poller = ExistencePoller::new(cfg.poll_settings());
    let provider = Provider::new(client, poller);
    match &cfg.plugin.version {
        Some(version) => provider.with_version(version),
        None => provider,
    }
}

pub fn build_app(provider: Arc<Provider>, cfg: &AppConfig) -> Router {
    let body_limit = cfg.server.body_limit_bytes;
    Router::new()
        .route("/healthz", get(handlers::healthz))
        // Provider configuration
        .route("/rpc/CheckConfig", post(handlers::check_config))
        .route("/rpc/DiffConfig", post(handlers::diff_config))
        .route("/rpc/Configure", post(handlers::configure))
        // Resource lifecycle
        .route("/rpc/Check", post(handlers::check))
        .route("/rpc/Diff", post(handlers::diff))
        .route("/rpc/Create", post(handlers::create))
        .route("/rpc/Read", post(handlers::read))
        .route("/rpc/Update", post(handlers::update))
        .route("/rpc/Delete", post(handlers::delete))
        .route("/rpc/Construct", post(handlers::construct))
        // Functions and metadata
        .route("/rpc/Invoke", post(handlers::invoke))
        .route("/rpc/GetPluginInfo", post(handlers::get_plugin_info))
        .route("/rpc/GetSchema", post(handlers::get_schema))
        .route("/rpc/Cancel", post(handlers::cancel))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "rpc.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                        http.status_code = tracing::field::Empty,
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(res.status().as_u16()),
                        );
                        tracing::debug!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
        .with_state(provider)
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub fn build(self) -> ProviderServer {
        let provider = Arc::new(provider_from_config(&self.config));
        tracing::info!(
            backend = ?self.config.directory.backend,
            version = provider.version(),
            "Provider initialized"
        );
        let app = build_app(provider, &self.config);

        ProviderServer {
            addr: self.addr,
            app,
        }
    }
}

impl ProviderServer {
    /// Bind, announce the port on stdout and serve until Ctrl+C.
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        let local = listener.local_addr()?;
        // The engine reads the port from the first line of stdout.
        println!("{}", local.port());
        tracing::info!("listening on {}", local);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
