use super::invoker::Invoker;
use super::protocol::*;
use crate::client::task::ClientEndpoint;

use axum::body::Bytes;
use axum::routing::{get, post};
use axum::{Extension, Json, Router, http::StatusCode};
use std::sync::Arc;

pub fn router(invoker: Arc<Invoker>, client: Arc<ClientEndpoint>) -> Router {
    Router::new()
        .route(ENDPOINT_OPERATION, post(handle_forwarded_operation))
        .route(ENDPOINT_CLIENT, post(handle_client_request))
        .route(ENDPOINT_HEALTH, get(handle_health))
        .layer(Extension(invoker))
        .layer(Extension(client))
}

/// Peer-to-peer entry point. Failures travel inside the body so the sender can
/// rebuild the original error kind; the status is always 200.
pub async fn handle_forwarded_operation(
    Extension(invoker): Extension<Arc<Invoker>>,
    Json(req): Json<ForwardOperationRequest>,
) -> (StatusCode, Json<ForwardOperationResponse>) {
    tracing::debug!(
        "Received forwarded {} for {}",
        req.operation.verb.name(),
        req.operation.target
    );

    let outcome = invoker
        .execute_forwarded(req.operation)
        .await
        .map_err(|e| e.to_info());

    (StatusCode::OK, Json(ForwardOperationResponse { outcome }))
}

pub async fn handle_client_request(
    Extension(client): Extension<Arc<ClientEndpoint>>,
    body: Bytes,
) -> (StatusCode, Vec<u8>) {
    (StatusCode::OK, client.handle(&body).await)
}

pub async fn handle_health(
    Extension(invoker): Extension<Arc<Invoker>>,
) -> (StatusCode, Json<HealthResponse>) {
    let partitions = invoker.partitions();
    (
        StatusCode::OK,
        Json(HealthResponse {
            address: partitions.local_address().to_string(),
            members: partitions.members().len(),
            owned_partitions: partitions.my_partitions().len(),
        }),
    )
}
