//! HTTP API surface.
//!
//! Thin handlers over [`CertService`]: parse, call, map errors to status
//! codes. The authenticated actor arrives in the `x-actor-id` header,
//! supplied by the auth boundary in front of this service. Local-fallback
//! artifacts are served statically under `/storage`.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use certanchor_core::{ActorId, CertificateId, CoreError, Fingerprint, OrgId};
use certanchor_ledger::LedgerError;
use certanchor_service::{CertService, ServiceError};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::error;

/// Shared handler state
pub struct AppState {
    /// The certificate service
    pub service: CertService,
}

/// Build the application router
#[must_use]
pub fn router(service: CertService) -> Router {
    let serve_root = service.storage_serve_root();
    let state = Arc::new(AppState { service });
    Router::new()
        .route("/", get(health))
        .route("/certificates/issue", post(issue))
        .route("/certificates", get(list_certificates))
        .route("/certificates/verify/{fingerprint}", get(verify))
        .route("/certificates/verify-file", post(verify_file))
        .route("/certificates/{id}/revoke", post(revoke))
        .route("/certificates/{id}", delete(delete_certificate))
        .route("/organizations", post(create_organization))
        .route("/organizations/{id}", get(get_organization))
        .route("/organizations/{id}/actors", post(link_actor))
        .nest_service("/storage", ServeDir::new(serve_root))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Service error wrapped for status-code mapping
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Authorization { .. } => StatusCode::FORBIDDEN,
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::Conflict { .. } | ServiceError::AlreadyRevoked { .. } => {
                StatusCode::CONFLICT
            }
            ServiceError::Ledger(LedgerError::Execution { .. }) => StatusCode::BAD_GATEWAY,
            ServiceError::Ledger(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Render(_)
            | ServiceError::OffsiteStorage { .. }
            | ServiceError::Storage(_)
            | ServiceError::Registry(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self.0, status = status.as_u16(), "request failed");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

fn actor_id(headers: &HeaderMap) -> Result<ActorId, ApiError> {
    let raw = headers
        .get("x-actor-id")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            ApiError(ServiceError::Authorization {
                reason: "missing x-actor-id header".to_string(),
            })
        })?;
    raw.parse().map_err(|_| {
        ApiError(ServiceError::Authorization {
            reason: "malformed x-actor-id header".to_string(),
        })
    })
}

fn invalid(field: &str, reason: &str) -> ApiError {
    ApiError(ServiceError::Validation(CoreError::validation(
        field, reason,
    )))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "service": "certanchor" }))
}

#[derive(Deserialize)]
struct IssueBody {
    owner_name: String,
    course_name: String,
}

async fn issue(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<IssueBody>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = actor_id(&headers)?;
    let issued = state
        .service
        .issue(actor, &body.owner_name, &body.course_name)
        .await?;
    Ok((StatusCode::CREATED, Json(issued)))
}

async fn list_certificates(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let actor = actor_id(&headers)?;
    let records = state.service.list_certificates(actor)?;
    Ok(Json(records))
}

async fn verify(
    State(state): State<Arc<AppState>>,
    Path(fingerprint): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let fingerprint = Fingerprint::from_hex(&fingerprint)
        .map_err(|_| invalid("fingerprint", "must be 64 lowercase hex chars"))?;
    let verdict = state.service.verify(fingerprint).await?;
    Ok(Json(verdict))
}

async fn verify_file(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    if body.is_empty() {
        return Err(invalid("body", "artifact bytes required"));
    }
    let verdict = state.service.verify_bytes(&body).await?;
    Ok(Json(verdict))
}

async fn revoke(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = actor_id(&headers)?;
    let id: CertificateId = id
        .parse()
        .map_err(|_| invalid("id", "malformed certificate id"))?;
    let record = state.service.revoke(actor, id).await?;
    Ok(Json(record))
}

async fn delete_certificate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = actor_id(&headers)?;
    let id: CertificateId = id
        .parse()
        .map_err(|_| invalid("id", "malformed certificate id"))?;
    state.service.delete(actor, id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
struct OrgBody {
    name: String,
    wallet_address: Option<String>,
    domain: Option<String>,
}

async fn create_organization(
    State(state): State<Arc<AppState>>,
    Json(body): Json<OrgBody>,
) -> Result<impl IntoResponse, ApiError> {
    let org = state
        .service
        .create_organization(&body.name, body.wallet_address, body.domain)?;
    Ok((StatusCode::CREATED, Json(org)))
}

async fn get_organization(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: OrgId = id
        .parse()
        .map_err(|_| invalid("id", "malformed organization id"))?;
    let org = state.service.organization(id)?;
    Ok(Json(org))
}

#[derive(Deserialize)]
struct LinkActorBody {
    actor_id: String,
}

async fn link_actor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<LinkActorBody>,
) -> Result<impl IntoResponse, ApiError> {
    let org: OrgId = id
        .parse()
        .map_err(|_| invalid("id", "malformed organization id"))?;
    let actor: ActorId = body
        .actor_id
        .parse()
        .map_err(|_| invalid("actor_id", "malformed actor id"))?;
    state.service.link_actor(actor, org)?;
    Ok(StatusCode::NO_CONTENT)
}
