use std::time::Duration;

use axum::{Json, Router, error_handling::HandleErrorLayer, http::StatusCode};
use tower::{BoxError, ServiceBuilder, timeout::error::Elapsed};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::warn;

use crate::infrastructure::settings::Settings;
use crate::presentation::app_error::ErrorBody;

pub(crate) fn apply_limits(router: Router, settings: &Settings) -> Router {
    router
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(Duration::from_secs(settings.http_request_timeout_secs))
                .concurrency_limit(settings.http_concurrency_limit),
        )
        .layer(RequestBodyLimitLayer::new(
            settings.http_request_body_limit_bytes,
        ))
}

async fn handle_middleware_error(err: BoxError) -> (StatusCode, Json<ErrorBody>) {
    let (status, message) = middleware_error_status(&err);
    warn!(error = %err, %status, "request rejected by middleware");
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}

fn middleware_error_status(err: &BoxError) -> (StatusCode, &'static str) {
    if err.is::<Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "request timed out")
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use tower::{BoxError, timeout::error::Elapsed};

    use super::middleware_error_status;

    #[test]
    fn elapsed_requests_time_out() {
        let err: BoxError = Box::new(Elapsed::new());
        assert_eq!(middleware_error_status(&err).0, StatusCode::REQUEST_TIMEOUT);
    }

    #[test]
    fn other_failures_are_internal() {
        let err: BoxError = "broken".into();
        assert_eq!(
            middleware_error_status(&err).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
