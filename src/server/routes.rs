//! Axum route handlers for the YapYard HTTP server.
//!
//! # Routes
//!
//! - `GET    /health`                        Liveness probe
//! - `POST   /login`                         Start a session, returns `session_id`
//! - `POST   /logout`                        End the session
//! - `GET    /personas`                      Persona names, custom personas, tones
//! - `POST   /personas`                      Create or replace a custom persona
//! - `GET    /comments`                      Current thread with heat and stats
//! - `POST   /comments`                      Generate a new thread
//! - `DELETE /comments`                      Clear the thread
//! - `PUT    /comments/:index/user_reply`    Save a reply draft
//! - `POST   /comments/:index/replies`       Reply and get the author's answer
//!
//! Every route except `/health` and `/login` needs the `x-session-id` header.
//! Sessions expire after `session_ttl_secs`, and logins past `max_sessions`
//! live sessions get 503.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::{AuthGate, ProviderKey};
use crate::engine::MAX_COMMENTS;
use crate::persona::SUGGESTED_TONES;
use crate::session::{default_selection, Session, DEFAULT_COMMENT_COUNT};
use crate::utilities::config::AppConfig;
use crate::utilities::errors::{ConfigError, EngineError};

/// Header carrying the session id issued by `/login`.
pub const SESSION_HEADER: &str = "x-session-id";

/// A session shared between requests. The lock is async so that a handler
/// waiting on a busy session yields its worker.
pub type SharedSession = Arc<Mutex<Session>>;

/// A live session and when it was started.
#[derive(Clone)]
pub struct SessionSlot {
    pub created_at: DateTime<Utc>,
    pub session: SharedSession,
}

impl SessionSlot {
    fn new(session: Session) -> Self {
        Self {
            created_at: session.created_at,
            session: Arc::new(Mutex::new(session)),
        }
    }
}

/// Builds the session for a successful login.
pub type SessionFactory =
    Arc<dyn Fn(&AppConfig, &ProviderKey) -> Result<Session, ConfigError> + Send + Sync>;

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(serde_json::json!({ "error": message.into() })))
}

fn engine_error(err: EngineError) -> ApiError {
    let status = match err {
        EngineError::PersonaNotFound { .. } | EngineError::CommentNotFound { .. } => {
            StatusCode::NOT_FOUND
        }
        EngineError::InvalidPersona { .. } => StatusCode::BAD_REQUEST,
    };
    api_error(status, err.to_string())
}

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: AuthGate,
    /// Live sessions by id.
    pub sessions: Arc<DashMap<Uuid, SessionSlot>>,
    factory: SessionFactory,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            auth: AuthGate::from_config(&config),
            config: Arc::new(config),
            sessions: Arc::new(DashMap::new()),
            factory: Arc::new(Session::new),
        }
    }

    /// Replace how sessions are built at login.
    pub fn with_session_factory(mut self, factory: SessionFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Drop sessions older than the configured TTL at `now`. Returns how
    /// many were removed.
    pub fn prune_expired(&self, now: DateTime<Utc>) -> usize {
        let ttl = i64::try_from(self.config.session_ttl_secs).unwrap_or(i64::MAX);
        let before = self.sessions.len();
        self.sessions
            .retain(|_, slot| (now - slot.created_at).num_seconds() <= ttl);
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            tracing::info!(removed, active = self.sessions.len(), "Expired sessions pruned");
        }
        removed
    }

    fn session_id(headers: &HeaderMap) -> Result<Uuid, ApiError> {
        headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v.trim()).ok())
            .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "Missing or malformed session id"))
    }

    fn session(&self, headers: &HeaderMap) -> Result<SharedSession, ApiError> {
        let id = Self::session_id(headers)?;
        self.sessions
            .get(&id)
            .map(|entry| entry.value().session.clone())
            .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "Unknown session"))
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/login", post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/personas", get(list_personas_handler).post(create_persona_handler))
        .route(
            "/comments",
            get(get_comments_handler)
                .post(generate_comments_handler)
                .delete(clear_comments_handler),
        )
        .route("/comments/:index/user_reply", put(user_reply_handler))
        .route("/comments/:index/replies", post(reply_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Current thread plus heat and stats.
fn thread_view(session: &Session) -> Value {
    let heat = session.heat();
    let level = session.heat_level();
    serde_json::json!({
        "content_preview": session.content_preview(),
        "comments": session.comments(),
        "heat": {
            "score": heat,
            "level": level.label(),
            "icon": level.icon(),
        },
        "stats": session.stats(),
    })
}

/// GET /health
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "service": "yapyard",
    }))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
    api_key: String,
}

/// POST /login
async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let key = state
        .auth
        .login(&request.username, &request.password, &request.api_key)
        .map_err(|e| api_error(StatusCode::UNAUTHORIZED, e.to_string()))?;

    state.prune_expired(Utc::now());
    if state.sessions.len() >= state.config.max_sessions {
        tracing::warn!(active = state.sessions.len(), "Login refused: session limit reached");
        return Err(api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Too many active sessions",
        ));
    }

    let session = (state.factory)(&state.config, &key).map_err(|e| {
        tracing::error!("Failed to build session: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let id = session.id;
    state.sessions.insert(id, SessionSlot::new(session));
    tracing::info!(session = %id, active = state.sessions.len(), "Session started");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "session_id": id })),
    ))
}

/// POST /logout
async fn logout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let id = AppState::session_id(&headers)?;
    state
        .sessions
        .remove(&id)
        .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "Unknown session"))?;
    tracing::info!(session = %id, "Session ended");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /personas
async fn list_personas_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let session = state.session(&headers)?;
    let session = session.lock().await;
    Ok(Json(serde_json::json!({
        "personas": session.store().names(),
        "custom": session.store().custom_personas(),
        "default_selection": default_selection(),
        "suggested_tones": SUGGESTED_TONES,
    })))
}

#[derive(Debug, Deserialize)]
struct CreatePersonaRequest {
    name: String,
    tone: String,
    goal: String,
}

/// POST /personas
async fn create_persona_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreatePersonaRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.session(&headers)?;
    let persona = session
        .lock()
        .await
        .spawn_persona(&request.name, &request.tone, &request.goal)
        .map_err(engine_error)?;
    Ok((StatusCode::CREATED, Json(persona)))
}

/// GET /comments
async fn get_comments_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let session = state.session(&headers)?;
    let view = thread_view(&*session.lock().await);
    Ok(Json(view))
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    content: String,
    #[serde(default)]
    personas: Option<Vec<String>>,
    #[serde(default)]
    count: Option<usize>,
}

/// POST /comments
///
/// Generation blocks on the provider, so it runs on the blocking pool.
async fn generate_comments_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<Value>, ApiError> {
    let session = state.session(&headers)?;

    if request.content.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Content must not be empty"));
    }
    let count = request.count.unwrap_or(DEFAULT_COMMENT_COUNT);
    if !(1..=MAX_COMMENTS).contains(&count) {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("count must be between 1 and {}", MAX_COMMENTS),
        ));
    }
    let personas = request.personas.unwrap_or_else(default_selection);

    let view = tokio::task::spawn_blocking(move || {
        let mut session = session.blocking_lock();
        session.generate(&request.content, &personas, count);
        thread_view(&session)
    })
    .await
    .map_err(|e| {
        tracing::error!("Comment generation task failed: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Comment generation failed")
    })?;

    Ok(Json(view))
}

/// DELETE /comments
async fn clear_comments_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let session = state.session(&headers)?;
    let mut session = session.lock().await;
    session.clear();
    Ok(Json(thread_view(&session)))
}

#[derive(Debug, Deserialize)]
struct ReplyRequest {
    text: String,
}

/// PUT /comments/:index/user_reply
async fn user_reply_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(index): Path<usize>,
    Json(request): Json<ReplyRequest>,
) -> Result<StatusCode, ApiError> {
    let session = state.session(&headers)?;
    session
        .lock()
        .await
        .set_user_reply(index, &request.text)
        .map_err(engine_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /comments/:index/replies
async fn reply_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(index): Path<usize>,
    Json(request): Json<ReplyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.session(&headers)?;

    if request.text.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Reply must not be empty"));
    }

    let reply = tokio::task::spawn_blocking(move || session.blocking_lock().reply(index, &request.text))
        .await
        .map_err(|e| {
            tracing::error!("Reply generation task failed: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Reply generation failed")
        })?
        .map_err(engine_error)?;

    Ok((StatusCode::CREATED, Json(reply)))
}
