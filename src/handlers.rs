use crate::errors::AppError;
use crate::form::FormFields;
use crate::model::{Selection, TodoId};
use crate::session::{Intent, Outcome};
use crate::state::AppState;
use crate::ui::render_page;
use crate::view::ViewModel;
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    response::{Html, Redirect},
};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
struct IntentResponse<'a> {
    outcome: Outcome,
    view: ViewModel<'a>,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let mut session = state.session.lock().await;
    let notice = session.take_notice();
    let view = session.view();
    Html(render_page(&view, notice.as_deref()))
}

pub async fn select_view(
    State(state): State<AppState>,
    Query(selection): Query<Selection>,
) -> Redirect {
    apply(&state, Intent::ViewSelected(selection)).await
}

pub async fn create_todo(
    State(state): State<AppState>,
    Form(fields): Form<FormFields>,
) -> Redirect {
    apply(&state, Intent::CreateRequested { fields }).await
}

pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<TodoId>,
    Form(fields): Form<FormFields>,
) -> Redirect {
    apply(&state, Intent::UpdateRequested { id, fields }).await
}

pub async fn toggle_todo(State(state): State<AppState>, Path(id): Path<TodoId>) -> Redirect {
    apply(&state, Intent::ToggleRequested { id }).await
}

pub async fn complete_todo(State(state): State<AppState>, Path(id): Path<TodoId>) -> Redirect {
    apply(&state, Intent::CompleteRequested { id: Some(id) }).await
}

pub async fn complete_draft(State(state): State<AppState>) -> Redirect {
    apply(&state, Intent::CompleteRequested { id: None }).await
}

pub async fn delete_todo(State(state): State<AppState>, Path(id): Path<TodoId>) -> Redirect {
    apply(&state, Intent::DeleteRequested { id }).await
}

pub async fn get_view(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let mut session = state.session.lock().await;
    let view = session.view();
    Ok(Json(serde_json::to_value(&view)?))
}

pub async fn post_intent(
    State(state): State<AppState>,
    Json(intent): Json<Intent>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.session.lock().await;
    let outcome = session.dispatch(intent).await?;
    let view = session.view();
    Ok(Json(serde_json::to_value(IntentResponse { outcome, view })?))
}

// Form posts land back on the page; failures become a one-shot notice there.
async fn apply(state: &AppState, intent: Intent) -> Redirect {
    let mut session = state.session.lock().await;
    if let Err(err) = session.dispatch(intent).await {
        session.notify(err.to_string());
    }
    Redirect::to("/")
}
