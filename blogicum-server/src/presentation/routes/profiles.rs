use axum::Router;
use axum::routing::{get, put};

use super::{authenticated, with_viewer};
use crate::presentation::AppState;
use crate::presentation::handlers::profiles::{get_profile, update_profile};

pub(crate) fn router(state: &AppState) -> Router<AppState> {
    let reads = Router::new().route("/api/profiles/{username}", get(get_profile));
    let writes = Router::new().route("/api/profile", put(update_profile));

    with_viewer(state, reads).merge(authenticated(state, writes))
}
