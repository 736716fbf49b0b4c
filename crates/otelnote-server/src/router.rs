//! Axum router wiring.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{api::notes, app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/note", post(notes::create_note))
        .route(
            "/note/:id",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note),
        )
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
