use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/view", get(handlers::select_view))
        .route("/todos", post(handlers::create_todo))
        .route("/draft/complete", post(handlers::complete_draft))
        .route("/todos/:id", post(handlers::update_todo))
        .route("/todos/:id/toggle", post(handlers::toggle_todo))
        .route("/todos/:id/complete", post(handlers::complete_todo))
        .route("/todos/:id/delete", post(handlers::delete_todo))
        .route("/api/view", get(handlers::get_view))
        .route("/api/intents", post(handlers::post_intent))
        .with_state(state)
}
