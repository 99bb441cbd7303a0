use axum::response::{IntoResponse, Response};
use std::any::Any;

use crate::error::ApiError;

/// Response for a handler that panicked.
///
/// The panic hook installed by [`crate::logging`] has already recorded the
/// message, location and backtrace by the time this runs.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = %detail, "unhandled_error");

    ApiError::internal_server_error("Internal server error").into_response()
}
