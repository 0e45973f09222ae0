use axum::Router;
use axum::routing::{get, post, put};

use super::{authenticated, with_viewer};
use crate::presentation::AppState;
use crate::presentation::handlers::comments::{
    add_comment, delete_comment, list_comments, update_comment,
};

pub(crate) fn router(state: &AppState) -> Router<AppState> {
    let reads = Router::new().route("/{id}/comments", get(list_comments));
    let writes = Router::new()
        .route("/{id}/comments", post(add_comment))
        .route(
            "/{id}/comments/{comment_id}",
            put(update_comment).delete(delete_comment),
        );

    with_viewer(state, reads).merge(authenticated(state, writes))
}
