use axum::{
    Json, Router, middleware,
    routing::{get, post},
};
use serde::Serialize;

use super::AppState;
use super::handlers::auth::{login, register};
use super::middleware::auth::{jwt_auth_middleware, optional_jwt_auth_middleware};

pub(crate) mod comments;
pub(crate) mod posts;
pub(crate) mod profiles;
pub(crate) mod taxonomy;

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .nest(
            "/api/posts",
            posts::router(&state).merge(comments::router(&state)),
        )
        .merge(taxonomy::router())
        .merge(profiles::router(&state))
        .with_state(state)
}

/// Routes readable by anyone; a bearer token, when sent, identifies the viewer.
fn with_viewer(state: &AppState, routes: Router<AppState>) -> Router<AppState> {
    routes.layer(middleware::from_fn_with_state(
        state.clone(),
        optional_jwt_auth_middleware,
    ))
}

fn authenticated(state: &AppState, routes: Router<AppState>) -> Router<AppState> {
    routes.layer(middleware::from_fn_with_state(
        state.clone(),
        jwt_auth_middleware,
    ))
}

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
}

async fn healthz() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}
