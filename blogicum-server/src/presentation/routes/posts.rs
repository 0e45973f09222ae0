use axum::Router;
use axum::routing::{get, post, put};

use super::{authenticated, with_viewer};
use crate::presentation::AppState;
use crate::presentation::handlers::posts::{
    create_post, delete_post, get_post, list_posts, update_post,
};

/// Mounted under `/api/posts`.
pub(crate) fn router(state: &AppState) -> Router<AppState> {
    let reads = Router::new()
        .route("/", get(list_posts))
        .route("/{id}", get(get_post));
    let writes = Router::new()
        .route("/", post(create_post))
        .route("/{id}", put(update_post).delete(delete_post));

    with_viewer(state, reads).merge(authenticated(state, writes))
}
