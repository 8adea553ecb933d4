//! HTTP API server for integration with other systems.
//!
//! Every client works inside a session created with `POST /sessions`. Requests
//! for one session run one at a time; different sessions run independently.

use super::{ensure_ready, with_model};
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::Settings;
use crate::error::VidnoteError;
use crate::orchestrator::Orchestrator;
use crate::rag::ContextChunk;
use crate::session::{ChatTurn, Session};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use uuid::Uuid;

/// A session and the last time a request touched it.
struct SessionSlot {
    session: Arc<Mutex<Session>>,
    last_used: Instant,
}

impl SessionSlot {
    fn new(session: Session) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            last_used: Instant::now(),
        }
    }

    /// Idle past the timeout and not held by a running request.
    fn is_expired(&self, idle_timeout: Duration) -> bool {
        self.last_used.elapsed() >= idle_timeout && Arc::strong_count(&self.session) == 1
    }
}

/// Shared application state.
struct AppState {
    orchestrator: Orchestrator,
    sessions: RwLock<HashMap<Uuid, SessionSlot>>,
    idle_timeout: Duration,
}

impl AppState {
    fn new(orchestrator: Orchestrator) -> Self {
        let idle_timeout =
            Duration::from_secs(orchestrator.settings().server.session_idle_secs);
        Self::with_idle_timeout(orchestrator, idle_timeout)
    }

    fn with_idle_timeout(orchestrator: Orchestrator, idle_timeout: Duration) -> Self {
        Self {
            orchestrator,
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    async fn insert(&self, session: Session) {
        self.sessions
            .write()
            .await
            .insert(session.id, SessionSlot::new(session));
    }

    /// Look up a live session and mark it used. Expired sessions are dropped.
    async fn session(&self, id: &str) -> Result<Arc<Mutex<Session>>, ApiError> {
        let not_found = || ApiError(VidnoteError::SessionNotFound(id.to_string()));
        let uuid = Uuid::parse_str(id).map_err(|_| not_found())?;

        let mut sessions = self.sessions.write().await;
        let slot = sessions.get_mut(&uuid).ok_or_else(not_found)?;
        if slot.is_expired(self.idle_timeout) {
            sessions.remove(&uuid);
            info!("Session {} expired", uuid);
            return Err(not_found());
        }

        slot.last_used = Instant::now();
        Ok(slot.session.clone())
    }

    /// Drop every expired session. Returns how many were removed.
    async fn sweep_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, slot| !slot.is_expired(self.idle_timeout));
        before - sessions.len()
    }
}

/// Run the HTTP API server.
pub async fn run_serve(
    host: &str,
    port: u16,
    model: Option<String>,
    settings: Settings,
) -> anyhow::Result<()> {
    ensure_ready(Operation::Generate)?;

    let sweep_interval = Duration::from_secs(settings.server.sweep_interval_secs);
    let orchestrator = Orchestrator::new(with_model(settings, model))?;
    let state = Arc::new(AppState::new(orchestrator));
    spawn_sweeper(state.clone(), sweep_interval);
    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("vidnote API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET    /health");
    Output::kv("New session", "POST   /sessions");
    Output::kv("End session", "DELETE /sessions/{id}");
    Output::kv("Notes", "POST   /sessions/{id}/notes");
    Output::kv("Prepare chat", "POST   /sessions/{id}/chat");
    Output::kv("Ask (RAG)", "POST   /sessions/{id}/ask");
    Output::kv("History", "GET    /sessions/{id}/history");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

fn spawn_sweeper(state: Arc<AppState>, period: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let removed = state.sweep_expired().await;
            if removed > 0 {
                info!("Dropped {} idle sessions", removed);
            }
        }
    });
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", delete(delete_session))
        .route("/sessions/{id}/notes", post(notes))
        .route("/sessions/{id}/chat", post(prepare_chat))
        .route("/sessions/{id}/ask", post(ask))
        .route("/sessions/{id}/history", get(history))
        .layer(cors)
        .with_state(state)
}

// === Errors ===

/// A library error rendered as a JSON response.
struct ApiError(VidnoteError);

impl From<VidnoteError> for ApiError {
    fn from(e: VidnoteError) -> Self {
        Self(e)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn status_for(error: &VidnoteError) -> StatusCode {
    match error {
        VidnoteError::InvalidInput(_) | VidnoteError::InvalidVideoUrl(_) => {
            StatusCode::BAD_REQUEST
        }
        VidnoteError::SessionNotFound(_)
        | VidnoteError::TranscriptsDisabled(_)
        | VidnoteError::NoTranscriptsAvailable(_) => StatusCode::NOT_FOUND,
        VidnoteError::ChatNotReady => StatusCode::CONFLICT,
        VidnoteError::TranscriptList(_)
        | VidnoteError::TranscriptFetch(_)
        | VidnoteError::Translation(_)
        | VidnoteError::Generation(_)
        | VidnoteError::Embedding(_)
        | VidnoteError::OpenAI(_)
        | VidnoteError::Http(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            warn!("Request failed: {}", self.0);
        }
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

// === Request/Response Types ===

#[derive(Serialize)]
struct SessionResponse {
    session_id: Uuid,
    created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct VideoRequest {
    /// YouTube URL or video ID
    url: String,
}

#[derive(Serialize)]
struct NotesResponse {
    video_id: String,
    source_language: String,
    translated: bool,
    topics: String,
    notes: String,
}

#[derive(Serialize)]
struct ChatReadyResponse {
    video_id: String,
    chunks_indexed: usize,
}

#[derive(Deserialize)]
struct AskRequest {
    question: String,
}

#[derive(Serialize)]
struct AskResponse {
    answer: String,
    sources: Vec<ContextChunk>,
}

#[derive(Serialize)]
struct HistoryResponse {
    session_id: Uuid,
    video_id: Option<String>,
    turns: Vec<ChatTurn>,
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = Session::new();
    let response = SessionResponse {
        session_id: session.id,
        created_at: session.created_at,
    };
    state.insert(session).await;
    info!("Created session {}", response.session_id);

    (StatusCode::CREATED, Json(response))
}

async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let not_found = || ApiError(VidnoteError::SessionNotFound(id.clone()));
    let uuid = Uuid::parse_str(&id).map_err(|_| not_found())?;

    match state.sessions.write().await.remove(&uuid) {
        Some(_) => {
            info!("Ended session {}", uuid);
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(not_found()),
    }
}

async fn notes(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<VideoRequest>,
) -> Result<Json<NotesResponse>, ApiError> {
    let session = state.session(&id).await?;
    let mut session = session.lock().await;

    let notes = state.orchestrator.generate_notes(&mut session, &req.url).await?;
    let (source_language, translated) = session
        .transcript()
        .map(|t| (t.source_language.clone(), t.translated))
        .unwrap_or_default();

    Ok(Json(NotesResponse {
        video_id: notes.video_id,
        source_language,
        translated,
        topics: notes.topics,
        notes: notes.notes,
    }))
}

async fn prepare_chat(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<VideoRequest>,
) -> Result<Json<ChatReadyResponse>, ApiError> {
    let session = state.session(&id).await?;
    let mut session = session.lock().await;

    let chunks_indexed = state.orchestrator.prepare_chat(&mut session, &req.url).await?;

    Ok(Json(ChatReadyResponse {
        video_id: session.video_id().unwrap_or_default().to_string(),
        chunks_indexed,
    }))
}

async fn ask(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let session = state.session(&id).await?;
    let mut session = session.lock().await;

    let response = state.orchestrator.ask(&mut session, &req.question).await?;

    Ok(Json(AskResponse {
        answer: response.answer,
        sources: response.sources,
    }))
}

async fn history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let session = state.session(&id).await?;
    let session = session.lock().await;

    Ok(Json(HistoryResponse {
        session_id: session.id,
        video_id: session.video_id().map(str::to_string),
        turns: session.history().to_vec(),
    }))
}
