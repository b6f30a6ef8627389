//! HTTP API server for the Attesta node.
//!
//! Mutations (register, verify, revoke, verifier edits) are forwarded to
//! the node event loop; reads (status queries, verifier listing, the audit
//! feed) go straight to the registry's read path.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;

use attesta_core::{AuditEntry, Commitment, IdentityRecord, Principal, RegistryError, StatusView};

use crate::commands::{CommandError, MutationResponse, NodeCommand};
use crate::state::NodeState;

// --- Request / response types ---

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub version: String,
    pub owner: String,
    pub identities: usize,
    pub verifiers: usize,
    pub audit_entries: usize,
    pub uptime_secs: u64,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub caller: String,
    pub commitment: String,
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub caller: String,
    pub commitment: String,
}

#[derive(Deserialize)]
pub struct RevokeRequest {
    pub caller: String,
    pub commitment: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Deserialize)]
pub struct VerifierEditRequest {
    pub caller: String,
    pub target: String,
}

#[derive(Serialize)]
pub struct VerifiersResponse {
    pub owner: String,
    pub verifiers: Vec<Principal>,
    pub count: usize,
}

#[derive(Deserialize)]
pub struct EventsQuery {
    /// Return only entries with seq strictly greater than this.
    pub after: Option<u64>,
}

#[derive(Serialize)]
pub struct EventsResponse {
    pub entries: Vec<AuditEntry>,
    pub count: usize,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

// --- Handlers ---

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}

async fn handle_status(State(state): State<Arc<NodeState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        owner: state.registry.owner().to_string(),
        identities: state.registry.len(),
        verifiers: state.registry.verifiers().len(),
        audit_entries: state.registry.log_len(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

async fn handle_register(
    State(state): State<Arc<NodeState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    let caller = parse_principal(&req.caller)?;
    let commitment = parse_commitment(&req.commitment)?;
    let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();

    let cmd = NodeCommand::Register {
        caller,
        commitment,
        reply: reply_tx,
    };

    send_command_and_await(&state, cmd, reply_rx).await
}

async fn handle_verify(
    State(state): State<Arc<NodeState>>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    let caller = parse_principal(&req.caller)?;
    let commitment = parse_commitment(&req.commitment)?;
    let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();

    let cmd = NodeCommand::Verify {
        caller,
        commitment,
        reply: reply_tx,
    };

    send_command_and_await(&state, cmd, reply_rx).await
}

async fn handle_revoke(
    State(state): State<Arc<NodeState>>,
    Json(req): Json<RevokeRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    let caller = parse_principal(&req.caller)?;
    let commitment = parse_commitment(&req.commitment)?;
    let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();

    let cmd = NodeCommand::Revoke {
        caller,
        commitment,
        reason: req.reason,
        reply: reply_tx,
    };

    send_command_and_await(&state, cmd, reply_rx).await
}

/// Status query. Always 200, even for unknown commitments — absence is
/// signalled through the all-false view, never an error.
async fn handle_check_status(
    State(state): State<Arc<NodeState>>,
    Path(commitment): Path<String>,
) -> Result<Json<StatusView>, ApiError> {
    let commitment = parse_commitment(&commitment)?;
    Ok(Json(state.registry.check_status(commitment)))
}

async fn handle_record(
    State(state): State<Arc<NodeState>>,
    Path(commitment): Path<String>,
) -> Result<Json<IdentityRecord>, ApiError> {
    let commitment = parse_commitment(&commitment)?;
    match state.registry.record(commitment) {
        Some(record) => Ok(Json(record)),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("commitment not registered: {commitment}"),
            }),
        )),
    }
}

async fn handle_add_verifier(
    State(state): State<Arc<NodeState>>,
    Json(req): Json<VerifierEditRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    let caller = parse_principal(&req.caller)?;
    let target = parse_principal(&req.target)?;
    let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();

    let cmd = NodeCommand::AddVerifier {
        caller,
        target,
        reply: reply_tx,
    };

    send_command_and_await(&state, cmd, reply_rx).await
}

async fn handle_remove_verifier(
    State(state): State<Arc<NodeState>>,
    Json(req): Json<VerifierEditRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    let caller = parse_principal(&req.caller)?;
    let target = parse_principal(&req.target)?;
    let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();

    let cmd = NodeCommand::RemoveVerifier {
        caller,
        target,
        reply: reply_tx,
    };

    send_command_and_await(&state, cmd, reply_rx).await
}

async fn handle_verifiers(State(state): State<Arc<NodeState>>) -> Json<VerifiersResponse> {
    let verifiers = state.registry.verifiers();
    let count = verifiers.len();
    Json(VerifiersResponse {
        owner: state.registry.owner().to_string(),
        verifiers,
        count,
    })
}

/// Replayable audit feed. With `?after=<seq>` a consumer resumes from a
/// known position; without it the full log is returned.
async fn handle_events(
    State(state): State<Arc<NodeState>>,
    Query(query): Query<EventsQuery>,
) -> Json<EventsResponse> {
    let entries = match query.after {
        Some(seq) => state.registry.entries_after(seq),
        None => state.registry.replay(),
    };
    let count = entries.len();
    Json(EventsResponse { entries, count })
}

// --- Helpers ---

fn parse_principal(s: &str) -> Result<Principal, ApiError> {
    Principal::new(s).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })
}

fn parse_commitment(s: &str) -> Result<Commitment, ApiError> {
    Commitment::from_hex(s).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })
}

/// Map a command failure to an HTTP status per the error taxonomy.
fn map_command_error(err: CommandError) -> ApiError {
    let status = match &err {
        CommandError::Registry(e) => match e {
            RegistryError::InvalidCommitment(_) | RegistryError::InvalidPrincipal(_) => {
                StatusCode::BAD_REQUEST
            }
            RegistryError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            RegistryError::NotRegistered(_) => StatusCode::NOT_FOUND,
            RegistryError::AlreadyRegistered(_)
            | RegistryError::AlreadyVerified(_)
            | RegistryError::AlreadyRevoked(_)
            | RegistryError::InvalidTransition { .. } => StatusCode::CONFLICT,
            RegistryError::CorruptAuditLog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        },
        CommandError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

/// Helper to send a command and await the reply.
async fn send_command_and_await(
    state: &Arc<NodeState>,
    cmd: NodeCommand,
    reply_rx: tokio::sync::oneshot::Receiver<Result<MutationResponse, CommandError>>,
) -> Result<Json<MutationResponse>, ApiError> {
    state.command_tx.send(cmd).await.map_err(|_| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "node event loop not running".into(),
            }),
        )
    })?;

    match reply_rx.await {
        Ok(Ok(resp)) => Ok(Json(resp)),
        Ok(Err(e)) => Err(map_command_error(e)),
        Err(_) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "event loop dropped the reply channel".into(),
            }),
        )),
    }
}

// --- Server ---

pub fn build_router(state: Arc<NodeState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(handle_health))
        .route("/api/v1/status", get(handle_status))
        .route("/api/v1/identities/register", post(handle_register))
        .route("/api/v1/identities/verify", post(handle_verify))
        .route("/api/v1/identities/revoke", post(handle_revoke))
        .route("/api/v1/identities/{commitment}", get(handle_check_status))
        .route("/api/v1/identities/{commitment}/record", get(handle_record))
        .route("/api/v1/verifiers", get(handle_verifiers))
        .route("/api/v1/verifiers/add", post(handle_add_verifier))
        .route("/api/v1/verifiers/remove", post(handle_remove_verifier))
        .route("/api/v1/events", get(handle_events))
        .with_state(state)
}

pub async fn start_api_server(listen_addr: SocketAddr, state: Arc<NodeState>) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(%listen_addr, "HTTP API server started");
    axum::serve(listener, app).await?;
    Ok(())
}
