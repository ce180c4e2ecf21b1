use crate::client::TodoApi;
use crate::errors::{ApiError, IntentError};
use crate::form::{FormFields, sanitize, validate_title};
use crate::model::{Selection, Todo, TodoId};
use crate::store::TodoStore;
use crate::view::{ViewModel, build_view_model};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

/// A user action, already classified by the input layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    CreateRequested {
        fields: FormFields,
    },
    UpdateRequested {
        id: TodoId,
        fields: FormFields,
    },
    DeleteRequested {
        id: TodoId,
    },
    ToggleRequested {
        id: TodoId,
    },
    /// "Mark as complete" from the todo form; `None` while the todo is still a draft.
    CompleteRequested {
        #[serde(default)]
        id: Option<TodoId>,
    },
    ViewSelected(Selection),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Outcome {
    Created(TodoId),
    Updated(TodoId),
    Deleted(TodoId),
    Toggled(TodoId),
    Completed(TodoId),
    Selected,
    /// The id was no longer in the store; nothing changed.
    Skipped(TodoId),
}

/// Owns the collection and the navigation state for one user.
///
/// Every mutation waits for the service to confirm it before the store is
/// touched, so the store never holds an unconfirmed change.
pub struct Session<A> {
    api: A,
    store: TodoStore,
    selection: Selection,
    notice: Option<String>,
}

impl<A: TodoApi + Sync> Session<A> {
    pub fn new(api: A, todos: Vec<Todo>) -> Self {
        Self {
            api,
            store: TodoStore::new(todos),
            selection: Selection::all(),
            notice: None,
        }
    }

    pub async fn load(api: A) -> Result<Self, ApiError> {
        let todos = api.list().await?;
        info!(count = todos.len(), "loaded todos");
        Ok(Self::new(api, todos))
    }

    pub fn store(&self) -> &TodoStore {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Builds the view model and keeps the corrected criterion for the next render.
    pub fn view(&mut self) -> ViewModel<'_> {
        let view = build_view_model(&self.store, &self.selection);
        self.selection = view.selection.clone();
        view
    }

    pub async fn dispatch(&mut self, intent: Intent) -> Result<Outcome, IntentError> {
        match intent {
            Intent::CreateRequested { fields } => self.create(fields).await,
            Intent::UpdateRequested { id, fields } => self.update(id, fields).await,
            Intent::DeleteRequested { id } => self.delete(id).await,
            Intent::ToggleRequested { id } => self.toggle(id).await,
            Intent::CompleteRequested { id: None } => Err(IntentError::NotCreated),
            Intent::CompleteRequested { id: Some(id) } => self.complete(id).await,
            Intent::ViewSelected(selection) => {
                self.selection = selection;
                Ok(Outcome::Selected)
            }
        }
    }

    async fn create(&mut self, fields: FormFields) -> Result<Outcome, IntentError> {
        validate_title(&fields)?;
        let todo = self
            .api
            .create(&sanitize(&fields))
            .await
            .inspect_err(|err| warn!("create rejected: {err}"))?;
        let id = todo.id;
        info!(id, "todo created");
        self.store.add(todo);
        self.selection = Selection::all();
        Ok(Outcome::Created(id))
    }

    async fn update(&mut self, id: TodoId, fields: FormFields) -> Result<Outcome, IntentError> {
        validate_title(&fields)?;
        let todo = self
            .api
            .update(id, &sanitize(&fields))
            .await
            .inspect_err(|err| warn!(id, "update rejected: {err}"))?;
        if !self.store.replace(id, todo) {
            return Ok(Outcome::Skipped(id));
        }
        info!(id, "todo updated");
        Ok(Outcome::Updated(id))
    }

    async fn delete(&mut self, id: TodoId) -> Result<Outcome, IntentError> {
        self.api
            .delete(id)
            .await
            .inspect_err(|err| warn!(id, "delete rejected: {err}"))?;
        match self.store.remove(id) {
            Some(_) => {
                info!(id, "todo deleted");
                Ok(Outcome::Deleted(id))
            }
            None => Ok(Outcome::Skipped(id)),
        }
    }

    async fn toggle(&mut self, id: TodoId) -> Result<Outcome, IntentError> {
        let Some(completed) = self.store.get(id).map(|todo| todo.completed) else {
            return Ok(Outcome::Skipped(id));
        };
        self.api
            .update(id, &json!({ "completed": !completed }))
            .await
            .inspect_err(|err| warn!(id, "toggle rejected: {err}"))?;
        if !self.store.toggle_completed(id) {
            return Ok(Outcome::Skipped(id));
        }
        info!(id, completed = !completed, "todo toggled");
        Ok(Outcome::Toggled(id))
    }

    async fn complete(&mut self, id: TodoId) -> Result<Outcome, IntentError> {
        let Some(was_completed) = self.store.get(id).map(|todo| todo.completed) else {
            return Ok(Outcome::Skipped(id));
        };
        self.api
            .update(id, &json!({ "completed": true }))
            .await
            .inspect_err(|err| warn!(id, "complete rejected: {err}"))?;
        if !was_completed {
            self.store.toggle_completed(id);
        }
        info!(id, "todo completed");
        Ok(Outcome::Completed(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::COMPLETED;
    use axum::http::StatusCode;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

    struct FakeApi {
        todos: Mutex<Vec<Todo>>,
        next_id: AtomicU64,
        reject: AtomicBool,
        calls: AtomicUsize,
    }

    impl FakeApi {
        fn with(todos: Vec<Todo>) -> Self {
            Self {
                todos: Mutex::new(todos),
                next_id: AtomicU64::new(100),
                reject: AtomicBool::new(false),
                calls: AtomicUsize::new(0),
            }
        }

        fn check(&self) -> Result<(), ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.reject.load(Ordering::SeqCst) {
                return Err(ApiError::Rejected {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                });
            }
            Ok(())
        }
    }

    fn not_found() -> ApiError {
        ApiError::Rejected {
            status: StatusCode::NOT_FOUND,
        }
    }

    impl TodoApi for FakeApi {
        async fn list(&self) -> Result<Vec<Todo>, ApiError> {
            self.check()?;
            Ok(self.todos.lock().unwrap().clone())
        }

        async fn create<B>(&self, body: &B) -> Result<Todo, ApiError>
        where
            B: Serialize + Sync,
        {
            self.check()?;
            let mut value = serde_json::to_value(body).unwrap();
            value["id"] = json!(self.next_id.fetch_add(1, Ordering::SeqCst));
            let todo: Todo = serde_json::from_value(value).unwrap();
            self.todos.lock().unwrap().push(todo.clone());
            Ok(todo)
        }

        async fn update<B>(&self, id: TodoId, patch: &B) -> Result<Todo, ApiError>
        where
            B: Serialize + Sync,
        {
            self.check()?;
            let mut todos = self.todos.lock().unwrap();
            let slot = todos
                .iter_mut()
                .find(|todo| todo.id == id)
                .ok_or_else(not_found)?;
            let mut current = serde_json::to_value(&*slot).unwrap();
            if let serde_json::Value::Object(fields) = serde_json::to_value(patch).unwrap() {
                for (name, value) in fields {
                    current[name] = value;
                }
            }
            *slot = serde_json::from_value(current).unwrap();
            Ok(slot.clone())
        }

        async fn delete(&self, id: TodoId) -> Result<(), ApiError> {
            self.check()?;
            let mut todos = self.todos.lock().unwrap();
            let before = todos.len();
            todos.retain(|todo| todo.id != id);
            if todos.len() == before {
                return Err(not_found());
            }
            Ok(())
        }
    }

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    async fn session() -> Session<FakeApi> {
        let api = FakeApi::with(vec![Todo::new(1, "A"), Todo::new(2, "B").done()]);
        Session::load(api).await.unwrap()
    }

    fn calls(session: &Session<FakeApi>) -> usize {
        session.api.calls.load(Ordering::SeqCst)
    }

    #[tokio::test]
    async fn create_appends_confirmed_todo_and_resets_view() {
        let mut session = session().await;
        session
            .dispatch(Intent::ViewSelected(Selection::new(COMPLETED, false)))
            .await
            .unwrap();

        let outcome = session
            .dispatch(Intent::CreateRequested {
                fields: fields(&[("title", "Water plants"), ("due_month", "4"), ("due_year", "2025")]),
            })
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Created(100));
        assert_eq!(session.store().len(), 3);
        let created = session.store().get(100).unwrap();
        assert_eq!(created.due_key().as_deref(), Some("4/2025"));
        assert_eq!(session.selection(), &Selection::all());
    }

    #[tokio::test]
    async fn short_title_is_rejected_before_dispatch() {
        let mut session = session().await;
        let before = calls(&session);
        let err = session
            .dispatch(Intent::CreateRequested {
                fields: fields(&[("title", " x y ")]),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, IntentError::InvalidTitle));
        assert_eq!(calls(&session), before);
        assert_eq!(session.store().len(), 2);
    }

    #[tokio::test]
    async fn rejected_create_leaves_store_untouched() {
        let mut session = session().await;
        session.api.reject.store(true, Ordering::SeqCst);
        let err = session
            .dispatch(Intent::CreateRequested {
                fields: fields(&[("title", "Never lands")]),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, IntentError::Remote(_)));
        assert_eq!(session.store().len(), 2);
    }

    #[tokio::test]
    async fn toggle_flips_after_confirmation() {
        let mut session = session().await;
        let outcome = session
            .dispatch(Intent::ToggleRequested { id: 1 })
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Toggled(1));
        assert!(session.store().get(1).unwrap().completed);

        session
            .dispatch(Intent::ViewSelected(Selection::new(COMPLETED, false)))
            .await
            .unwrap();
        let view = session.view();
        assert!(view.selected.iter().any(|entry| entry.todo.id == 1));
    }

    #[tokio::test]
    async fn rejected_toggle_does_not_flip() {
        let mut session = session().await;
        session.api.reject.store(true, Ordering::SeqCst);
        assert!(session.dispatch(Intent::ToggleRequested { id: 1 }).await.is_err());
        assert!(!session.store().get(1).unwrap().completed);
    }

    #[tokio::test]
    async fn rejected_update_keeps_stored_record() {
        let mut session = session().await;
        let before = session.store().todos().to_vec();
        session.api.reject.store(true, Ordering::SeqCst);
        let err = session
            .dispatch(Intent::UpdateRequested {
                id: 1,
                fields: fields(&[("title", "A renamed"), ("due_month", "5"), ("due_year", "2026")]),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, IntentError::Remote(_)));
        assert_eq!(session.store().todos(), before.as_slice());
    }

    #[tokio::test]
    async fn rejected_delete_keeps_record() {
        let mut session = session().await;
        let before = session.store().todos().to_vec();
        session.api.reject.store(true, Ordering::SeqCst);
        let err = session
            .dispatch(Intent::DeleteRequested { id: 2 })
            .await
            .unwrap_err();
        assert!(matches!(err, IntentError::Remote(_)));
        assert_eq!(session.store().todos(), before.as_slice());
        assert!(session.store().get(2).is_some());
    }

    #[tokio::test]
    async fn rejected_complete_leaves_todo_open() {
        let mut session = session().await;
        let before = session.store().todos().to_vec();
        session.api.reject.store(true, Ordering::SeqCst);
        let err = session
            .dispatch(Intent::CompleteRequested { id: Some(1) })
            .await
            .unwrap_err();
        assert!(matches!(err, IntentError::Remote(_)));
        assert!(!session.store().get(1).unwrap().completed);
        assert_eq!(session.store().todos(), before.as_slice());
    }

    #[tokio::test]
    async fn toggle_unknown_id_is_a_silent_no_op() {
        let mut session = session().await;
        let before = calls(&session);
        let outcome = session
            .dispatch(Intent::ToggleRequested { id: 77 })
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Skipped(77));
        assert_eq!(calls(&session), before);
    }

    #[tokio::test]
    async fn delete_removes_confirmed_record() {
        let mut session = session().await;
        let outcome = session
            .dispatch(Intent::DeleteRequested { id: 2 })
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Deleted(2));
        assert_eq!(session.store().len(), 1);
        assert!(session.store().get(2).is_none());
    }

    #[tokio::test]
    async fn update_replaces_with_service_record() {
        let mut session = session().await;
        let outcome = session
            .dispatch(Intent::UpdateRequested {
                id: 1,
                fields: fields(&[
                    ("title", "A renamed"),
                    ("description", "details"),
                    ("due_month", "12"),
                    ("due_year", "2023"),
                ]),
            })
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Updated(1));
        let todo = session.store().get(1).unwrap();
        assert_eq!(todo.title, "A renamed");
        assert_eq!(todo.description, "details");
        assert_eq!(todo.due_key().as_deref(), Some("12/2023"));
    }

    #[tokio::test]
    async fn complete_without_id_is_refused() {
        let mut session = session().await;
        let err = session
            .dispatch(Intent::CompleteRequested { id: None })
            .await
            .unwrap_err();
        assert!(matches!(err, IntentError::NotCreated));
    }

    #[tokio::test]
    async fn complete_never_reopens_a_done_todo() {
        let mut session = session().await;
        session
            .dispatch(Intent::CompleteRequested { id: Some(2) })
            .await
            .unwrap();
        assert!(session.store().get(2).unwrap().completed);

        session
            .dispatch(Intent::CompleteRequested { id: Some(1) })
            .await
            .unwrap();
        assert!(session.store().get(1).unwrap().completed);
    }

    #[tokio::test]
    async fn view_drops_stale_completed_sub_list() {
        let api = FakeApi::with(vec![Todo::new(1, "march").due(3, 2024).done()]);
        let mut session = Session::load(api).await.unwrap();
        session
            .dispatch(Intent::ViewSelected(Selection::new("3/2024", true)))
            .await
            .unwrap();
        assert!(session.view().selection.completed);

        session
            .dispatch(Intent::ToggleRequested { id: 1 })
            .await
            .unwrap();
        let view = session.view();
        assert!(!view.selection.completed);
        assert_eq!(view.current_section.count, 1);
        assert_eq!(session.selection(), &Selection::new("3/2024", false));
    }

    #[test]
    fn intents_decode_from_tagged_json() {
        let intent: Intent =
            serde_json::from_str(r#"{"kind":"view_selected","select":"3/2024","completed":true}"#)
                .unwrap();
        assert!(matches!(intent, Intent::ViewSelected(ref s) if s.select == "3/2024" && s.completed));

        let intent: Intent = serde_json::from_str(r#"{"kind":"complete_requested"}"#).unwrap();
        assert!(matches!(intent, Intent::CompleteRequested { id: None }));
    }
}
