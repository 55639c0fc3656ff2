use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use websignin_provider::Provider;
use websignin_provider::protocol::{
    CheckRequest, CheckResponse, ConfigureRequest, ConfigureResponse, ConstructRequest,
    ConstructResponse, CreateRequest, CreateResponse, DeleteRequest, DiffRequest, DiffResponse,
    Empty, GetSchemaRequest, GetSchemaResponse, InvokeRequest, InvokeResponse, PluginInfo,
    ReadRequest, ReadResponse, UpdateRequest, UpdateResponse,
};

use crate::error::RpcError;

pub type SharedProvider = State<Arc<Provider>>;
type RpcResult<T> = Result<Json<T>, RpcError>;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

pub async fn check_config(
    State(provider): SharedProvider,
    Json(request): Json<CheckRequest>,
) -> RpcResult<CheckResponse> {
    Ok(Json(provider.check_config(request).await?))
}

pub async fn diff_config(
    State(provider): SharedProvider,
    Json(request): Json<DiffRequest>,
) -> RpcResult<DiffResponse> {
    Ok(Json(provider.diff_config(request).await?))
}

pub async fn configure(
    State(provider): SharedProvider,
    Json(request): Json<ConfigureRequest>,
) -> RpcResult<ConfigureResponse> {
    Ok(Json(provider.configure(request).await?))
}

pub async fn check(
    State(provider): SharedProvider,
    Json(request): Json<CheckRequest>,
) -> RpcResult<CheckResponse> {
    Ok(Json(provider.check(request).await?))
}

pub async fn diff(
    State(provider): SharedProvider,
    Json(request): Json<DiffRequest>,
) -> RpcResult<DiffResponse> {
    Ok(Json(provider.diff(request).await?))
}

pub async fn create(
    State(provider): SharedProvider,
    Json(request): Json<CreateRequest>,
) -> RpcResult<CreateResponse> {
    Ok(Json(provider.create(request).await?))
}

pub async fn read(
    State(provider): SharedProvider,
    Json(request): Json<ReadRequest>,
) -> RpcResult<ReadResponse> {
    Ok(Json(provider.read(request).await?))
}

pub async fn update(
    State(provider): SharedProvider,
    Json(request): Json<UpdateRequest>,
) -> RpcResult<UpdateResponse> {
    Ok(Json(provider.update(request).await?))
}

pub async fn delete(
    State(provider): SharedProvider,
    Json(request): Json<DeleteRequest>,
) -> RpcResult<Empty> {
    provider.delete(request).await?;
    Ok(Json(Empty {}))
}

pub async fn construct(
    State(provider): SharedProvider,
    Json(request): Json<ConstructRequest>,
) -> RpcResult<ConstructResponse> {
    Ok(Json(provider.construct(request).await?))
}

pub async fn invoke(
    State(provider): SharedProvider,
    Json(request): Json<InvokeRequest>,
) -> RpcResult<InvokeResponse> {
    Ok(Json(provider.invoke(request).await?))
}

pub async fn get_plugin_info(State(provider): SharedProvider) -> RpcResult<PluginInfo> {
    Ok(Json(provider.get_plugin_info().await?))
}

pub async fn get_schema(
    State(provider): SharedProvider,
    Json(request): Json<GetSchemaRequest>,
) -> RpcResult<GetSchemaResponse> {
    Ok(Json(provider.get_schema(request).await?))
}

pub async fn cancel(State(provider): SharedProvider) -> RpcResult<Empty> {
    provider.cancel().await?;
    Ok(Json(Empty {}))
}
