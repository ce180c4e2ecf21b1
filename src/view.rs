use crate::buckets::{DateBuckets, bucket_by_date, bucket_completed_by_date};
use crate::model::{Selection, Todo};
use crate::selection::{DueTodo, compute_selection};
use crate::store::TodoStore;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub title: String,
    pub count: usize,
}

/// Everything the renderer needs for one display cycle, borrowed from the store.
#[derive(Debug, Clone, Serialize)]
pub struct ViewModel<'a> {
    pub todos: &'a [Todo],
    pub done: Vec<&'a Todo>,
    pub todos_by_date: DateBuckets<'a>,
    pub done_todos_by_date: DateBuckets<'a>,
    pub selected: Vec<DueTodo<'a>>,
    pub current_section: Section,
    pub selection: Selection,
}

pub fn build_view_model<'a>(store: &'a TodoStore, criterion: &Selection) -> ViewModel<'a> {
    let todos = store.todos();
    let selected = compute_selection(todos, criterion);

    ViewModel {
        todos,
        done: store.completed(),
        todos_by_date: bucket_by_date(todos),
        done_todos_by_date: bucket_completed_by_date(todos),
        current_section: Section {
            title: selected.criterion.select.clone(),
            count: selected.todos.len(),
        },
        selected: selected.todos,
        selection: selected.criterion,
    }
}
