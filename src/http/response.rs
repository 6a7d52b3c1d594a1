//! Response bodies and status mapping for the admin API.
//!
//! # Design Decisions
//! - Every mutation answers with a notice the client can show as-is
//! - Remote failures map to 502 Bad Gateway; the service itself is healthy

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::service::{Notice, SaveOutcome};

/// Status used whenever the remote store or function rejected a call.
pub const REMOTE_FAILURE: StatusCode = StatusCode::BAD_GATEWAY;

/// Body of a create or update call.
#[derive(Debug, Serialize)]
pub struct SaveResponse<F> {
    pub notice: Notice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<SaveOutcome>,
    /// The submitted form, echoed back when the save failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<F>,
}

/// A bare notice with `status`, or 502 if the notice is an error.
pub fn notice_response(status: StatusCode, notice: Notice) -> Response {
    let status = if notice.is_error() { REMOTE_FAILURE } else { status };
    (status, Json(notice)).into_response()
}
