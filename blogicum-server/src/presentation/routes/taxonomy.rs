use axum::{Router, routing::get};

use crate::presentation::AppState;
use crate::presentation::handlers::taxonomy::{category_posts, list_categories, list_locations};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(list_categories))
        .route("/api/categories/{slug}/posts", get(category_posts))
        .route("/api/locations", get(list_locations))
}
