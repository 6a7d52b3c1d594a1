pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use crate::http::server::AppState;
use crate::tables::{Multipliers, Operators};
use self::auth::admin_auth_middleware;
use self::handlers::*;

pub fn setup_admin_router(state: AppState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route(
            "/admin/multipliers",
            get(list_records::<Multipliers>).post(create_record::<Multipliers>),
        )
        .route(
            "/admin/multipliers/{id}",
            put(update_record::<Multipliers>).delete(delete_record::<Multipliers>),
        )
        .route("/admin/multipliers/{id}/toggle", post(toggle_record::<Multipliers>))
        .route(
            "/admin/operators",
            get(list_records::<Operators>).post(create_record::<Operators>),
        )
        .route(
            "/admin/operators/{id}",
            put(update_record::<Operators>).delete(delete_record::<Operators>),
        )
        .route("/admin/operators/{id}/toggle", post(toggle_record::<Operators>))
        .route("/admin/notifications", post(forward_notification))
        .route_layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .with_state(state)
}
