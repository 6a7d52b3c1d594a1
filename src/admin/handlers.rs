use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::http::response::{notice_response, SaveResponse, REMOTE_FAILURE};
use crate::http::server::AppState;
use crate::service::{ConfigService, EditDialog, Notice};
use crate::tables::ConfigTable;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub store: &'static str,
    pub notifications: bool,
}

/// Body of a toggle call: the flag value the client currently displays.
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub is_active: bool,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        store: state.store_backend,
        notifications: state.forwarder.is_some(),
    })
}

pub async fn list_records<T: ConfigTable>(
    State(service): State<ConfigService<T>>,
) -> Json<Vec<T::Record>> {
    Json(service.fetch_all().await)
}

pub async fn create_record<T: ConfigTable>(
    State(service): State<ConfigService<T>>,
    Json(input): Json<T::Input>,
) -> Response {
    submit_form(&service, None, T::form_from_input(input)).await
}

pub async fn update_record<T: ConfigTable>(
    State(service): State<ConfigService<T>>,
    Path(id): Path<String>,
    Json(input): Json<T::Input>,
) -> Response {
    submit_form(&service, Some(id), T::form_from_input(input)).await
}

async fn submit_form<T: ConfigTable>(
    service: &ConfigService<T>,
    id: Option<String>,
    form: T::Form,
) -> Response {
    let mut dialog = EditDialog::<T>::new();
    dialog.restore(id, form);
    let submission = dialog.submit(service).await;

    match submission.outcome {
        Some(outcome) => {
            let status = if outcome.is_update() { StatusCode::OK } else { StatusCode::CREATED };
            let body = SaveResponse::<T::Form> {
                notice: submission.notice,
                outcome: Some(outcome),
                form: None,
            };
            (status, Json(body)).into_response()
        }
        None => {
            // Dialog stayed open; hand the entered values back.
            let body = SaveResponse {
                notice: submission.notice,
                outcome: None,
                form: Some(dialog.form().clone()),
            };
            (REMOTE_FAILURE, Json(body)).into_response()
        }
    }
}

pub async fn delete_record<T: ConfigTable>(
    State(service): State<ConfigService<T>>,
    Path(id): Path<String>,
) -> Response {
    let result = service.delete(&id).await;
    notice_response(StatusCode::OK, Notice::deleted::<T>(&result))
}

pub async fn toggle_record<T: ConfigTable>(
    State(service): State<ConfigService<T>>,
    Path(id): Path<String>,
    Json(request): Json<ToggleRequest>,
) -> Response {
    let result = service.toggle_active(&id, request.is_active).await;
    match Notice::toggled::<T>(&result) {
        // The new value is only observable through the next read.
        None => StatusCode::NO_CONTENT.into_response(),
        Some(notice) => notice_response(StatusCode::OK, notice),
    }
}

pub async fn forward_notification(
    State(state): State<AppState>,
    Json(payload): Json<Map<String, Value>>,
) -> Response {
    let forwarder = match &state.forwarder {
        Some(f) => f,
        None => {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Notice::error("Notification forwarding disabled")),
            )
                .into_response()
        }
    };

    let result = forwarder.forward(payload).await;
    notice_response(StatusCode::ACCEPTED, Notice::forwarded(&result))
}
