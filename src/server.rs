//!
//! healthwyz HTTP server
//! ---------------------
//! Axum-based HTTP API for the portal authentication service.
//!
//! Responsibilities:
//! - Login/logout endpoints backed by the identity directory.
//! - Dual-surface session persistence (client store + cookies) on login,
//!   cleared symmetrically on logout.
//! - Session introspection gated on the token cookie.
//! - Role -> landing route resolution.
//! - Startup inventory logs for the loaded directory.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{extract::State, Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::directory::Directory;
use crate::error::AppError;
use crate::fixtures;
use crate::identity::{
    parse_cookie, SessionAuthenticator, SessionPersistence, AUTH_TOKEN_COOKIE,
};
use crate::roles::{landing_route_for, Role};

const UNEXPECTED_MESSAGE: &str = "Something went wrong. Please try again.";

/// Shared server state injected into all handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<SessionAuthenticator>,
    pub persistence: Arc<SessionPersistence>,
}

impl AppState {
    pub fn new(directory: Arc<Directory>) -> Self {
        AppState {
            auth: Arc::new(SessionAuthenticator::new(directory)),
            persistence: Arc::new(SessionPersistence::new()),
        }
    }
}

/// Mount all HTTP routes onto the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "healthwyz ok" }))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/session", get(session))
        .route("/routes/landing/{role}", get(landing))
        .with_state(state)
}

fn log_directory_inventory(directory: &Directory) {
    let mut counts: Vec<(Role, usize)> = Role::ALL.iter().map(|r| (*r, 0usize)).collect();
    for id in directory.iter() {
        if let Some(slot) = counts.iter_mut().find(|(r, _)| *r == id.role) {
            slot.1 += 1;
        }
    }
    for (role, n) in counts {
        if n > 0 {
            info!(target: "startup", "directory role={} identities={}", role, n);
        }
    }
    info!(target: "startup", "directory total identities={}", directory.len());
}

/// Start the healthwyz HTTP server bound to the given port.
///
/// The identity directory is built once here, from the fixture file when one
/// is supplied and from the built-in demo seed otherwise, then injected into
/// the authenticator for the life of the process.
pub async fn run_with_port(http_port: u16, fixtures_path: Option<&Path>) -> anyhow::Result<()> {
    let directory = match fixtures_path {
        Some(p) => {
            info!(target: "startup", "loading identity fixtures from {}", p.display());
            fixtures::directory_from_file(p)?
        }
        None => {
            info!(target: "startup", "no fixture file supplied, seeding demo directory");
            fixtures::demo_directory()?
        }
    };
    log_directory_inventory(&directory);

    let state = AppState::new(Arc::new(directory));
    let app = router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", http_port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// Convenience entry using the default port.
pub async fn run() -> anyhow::Result<()> {
    run_with_port(7878, None).await
}

#[derive(Debug, Deserialize)]
struct LoginPayload {
    email: String,
    password: String,
    role: String,
}

async fn login(State(state): State<AppState>, Json(payload): Json<LoginPayload>) -> impl IntoResponse {
    match state.auth.authenticate(&payload.email, &payload.password, &payload.role) {
        Ok(user) => match state.persistence.persist(&user) {
            Ok(cookies) => {
                let mut headers = HeaderMap::new();
                for c in cookies {
                    headers.append("Set-Cookie", c);
                }
                info!(user = %user.email, role = %user.role, "login ok");
                (StatusCode::OK, headers, Json(json!({"success": true, "user": user})))
            }
            Err(e) => {
                error!("session persist failed: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    HeaderMap::new(),
                    Json(json!({"success": false, "message": UNEXPECTED_MESSAGE})),
                )
            }
        },
        Err(err) => {
            // Internal taxonomy goes to the log; the client gets one generic
            // message for every failure kind
            warn!(code = err.code(), "login rejected");
            let app_err = AppError::from(err);
            let status = StatusCode::from_u16(app_err.http_status())
                .unwrap_or(StatusCode::UNAUTHORIZED);
            (
                status,
                HeaderMap::new(),
                Json(json!({"success": false, "message": app_err.message()})),
            )
        }
    }
}

/// Ends only the caller's session: the presented token cookie selects which
/// client surface is dropped, other sessions stay live.
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let token = parse_cookie(&headers, AUTH_TOKEN_COOKIE);
    let cookies = state.persistence.clear(token.as_deref());
    let mut headers = HeaderMap::new();
    for c in cookies {
        headers.append("Set-Cookie", c);
    }
    (StatusCode::OK, headers, Json(json!({"success": true})))
}

/// Current-session introspection: the request gate. The token cookie keys the
/// session lookup, so a stale or forged cookie reads as anonymous.
async fn session(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let user = parse_cookie(&headers, AUTH_TOKEN_COOKIE)
        .and_then(|token| state.persistence.load(&token));
    match user {
        Some(user) => (StatusCode::OK, Json(json!({"success": true, "user": user}))),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "message": "Not signed in."})),
        ),
    }
}

/// Role -> landing route. Total: unknown role strings answer the default
/// fallback path rather than an error.
async fn landing(axum::extract::Path(role): axum::extract::Path<String>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({"role": role, "path": landing_route_for(&role)})),
    )
}
