use std::sync::Arc;

use anyhow::Result;
use tracing::info;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use application::auth_service::AuthService;
use application::blog_service::BlogService;
use application::clock::{Clock, SystemClock};
use application::comment_service::CommentService;
use application::profile_service::ProfileService;
use data::repositories::postgres::comment_repository::PostgresCommentRepository;
use data::repositories::postgres::post_repository::PostgresPostRepository;
use data::repositories::postgres::taxonomy_repository::PostgresTaxonomyRepository;
use data::repositories::postgres::user_repository::PostgresUserRepository;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::jwt::JwtService;
use infrastructure::logging::init_logging;
use infrastructure::settings::Settings;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let pool = create_pool(&settings.database_url, settings.database_max_connections).await?;
    run_migrations(&pool).await?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let user_repo = PostgresUserRepository::new(pool.clone());
    let post_repo = PostgresPostRepository::new(pool.clone());
    let comment_repo = PostgresCommentRepository::new(pool.clone());
    let taxonomy_repo = PostgresTaxonomyRepository::new(pool);

    let jwt = JwtService::new(&settings.jwt_secret, settings.jwt_ttl_seconds);

    let state = AppState {
        auth_service: Arc::new(AuthService::new(user_repo.clone(), jwt.clone())),
        blog_service: Arc::new(BlogService::new(
            post_repo.clone(),
            taxonomy_repo,
            clock.clone(),
        )),
        comment_service: Arc::new(CommentService::new(
            comment_repo,
            post_repo.clone(),
            clock.clone(),
        )),
        profile_service: Arc::new(ProfileService::new(user_repo, post_repo, clock)),
        jwt: Arc::new(jwt),
        posts_per_page: settings.posts_per_page,
    };

    info!(
        posts_per_page = settings.posts_per_page,
        "blogicum server starting"
    );
    server::run_http(&settings, state).await
}
