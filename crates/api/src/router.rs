//! Application router assembly.
//!
//! [`build_app_router`] is shared by the server binary and the integration
//! tests. Every response that leaves it, including unmatched paths, timeouts
//! and panics, carries the `{ "message": ... }` error envelope.

use std::any::Any;

use axum::error_handling::HandleErrorLayer;
use axum::extract::DefaultBodyLimit;
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use axum::{BoxError, Router};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::{ConfigError, ServerConfig, REQUEST_ID_HEADER};
use crate::error::AppError;
use crate::extract::MAX_BODY_BYTES;
use crate::routes;
use crate::state::AppState;

/// Build the routed application with its middleware.
///
/// Fails only if the CORS origins in `state.config` cannot be parsed.
pub fn build_app_router(state: AppState) -> Result<Router, ConfigError> {
    let config = state.config.clone();

    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .fallback(route_not_found)
        .with_state(state);

    with_middleware(app, &config)
}

/// Wrap `app` in the request pipeline, outermost first:
///
/// 1. CORS
/// 2. Request id assignment
/// 3. Request span tracing
/// 4. Request id echo on the response
/// 5. Whole-request timeout
/// 6. Panic recovery
/// 7. Body size cap
pub(crate) fn with_middleware(app: Router, config: &ServerConfig) -> Result<Router, ConfigError> {
    let cors = config.cors_layer()?;

    Ok(app
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(timeout_response))
                .timeout(config.request_timeout()),
        )
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
        .layer(cors))
}

async fn route_not_found(uri: Uri) -> AppError {
    AppError::RouteNotFound(uri.path().to_string())
}

async fn timeout_response(err: BoxError) -> AppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        AppError::RequestTimeout
    } else {
        AppError::InternalError(format!("unhandled middleware error: {err}"))
    }
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");

    AppError::InternalError(format!("handler panicked: {detail}")).into_response()
}
