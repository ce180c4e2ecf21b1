use crate::model::{Todo, TodoId};
use tracing::{debug, warn};

/// Client-side copy of the todo collection, in insertion order.
///
/// Mutations only run once the service has confirmed them, and none of them
/// request a render.
#[derive(Debug, Clone, Default)]
pub struct TodoStore {
    todos: Vec<Todo>,
}

impl TodoStore {
    pub fn new(todos: Vec<Todo>) -> Self {
        Self { todos }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    pub fn completed(&self) -> Vec<&Todo> {
        self.todos.iter().filter(|todo| todo.completed).collect()
    }

    pub fn add(&mut self, todo: Todo) {
        debug!(id = todo.id, "adding todo");
        self.todos.push(todo);
    }

    /// Swaps in the service's canonical record. Returns false when the id is gone.
    pub fn replace(&mut self, id: TodoId, todo: Todo) -> bool {
        match self.position(id) {
            Some(index) => {
                self.todos[index] = todo;
                true
            }
            None => {
                warn!(id, "replace skipped, todo not in store");
                false
            }
        }
    }

    pub fn remove(&mut self, id: TodoId) -> Option<Todo> {
        let removed = self.position(id).map(|index| self.todos.remove(index));
        if removed.is_none() {
            debug!(id, "remove skipped, todo not in store");
        }
        removed
    }

    pub fn toggle_completed(&mut self, id: TodoId) -> bool {
        match self.todos.iter_mut().find(|todo| todo.id == id) {
            Some(todo) => {
                todo.completed = !todo.completed;
                true
            }
            None => {
                debug!(id, "toggle skipped, todo not in store");
                false
            }
        }
    }

    fn position(&self, id: TodoId) -> Option<usize> {
        self.todos.iter().position(|todo| todo.id == id)
    }
}
