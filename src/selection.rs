use crate::buckets::bucket_completed_by_date;
use crate::model::{ALL_TODOS, COMPLETED, NO_DUE_DATE, Selection, Todo};
use serde::Serialize;

/// A todo annotated with its display due date for one render.
#[derive(Debug, Clone, Serialize)]
pub struct DueTodo<'a> {
    #[serde(flatten)]
    pub todo: &'a Todo,
    pub due_date: String,
}

#[derive(Debug, Clone)]
pub struct Selected<'a> {
    /// The criterion actually applied; `completed` is cleared when the
    /// requested completed sub-list no longer exists.
    pub criterion: Selection,
    pub todos: Vec<DueTodo<'a>>,
}

pub fn compute_selection<'a>(todos: &'a [Todo], criterion: &Selection) -> Selected<'a> {
    let mut criterion = criterion.clone();

    let viewing_completed = criterion.select == COMPLETED
        || (criterion.completed
            && bucket_completed_by_date(todos)
                .get(criterion.select.as_str())
                .is_some_and(|bucket| !bucket.is_empty()));
    if !viewing_completed {
        criterion.completed = false;
    }

    let mut selected: Vec<DueTodo<'a>> = todos
        .iter()
        .filter(|todo| !viewing_completed || todo.completed)
        .filter(|todo| matches_date(todo, &criterion.select))
        .map(|todo| DueTodo {
            todo,
            due_date: todo.due_date(),
        })
        .collect();

    // Stable: completed sink, both halves keep their relative order.
    selected.sort_by_key(|entry| entry.todo.completed);

    Selected {
        criterion,
        todos: selected,
    }
}

fn matches_date(todo: &Todo, select: &str) -> bool {
    match select {
        ALL_TODOS | COMPLETED => true,
        NO_DUE_DATE => !todo.is_dated(),
        key => match (key.split_once('/'), todo.month, todo.year) {
            (Some((month, year)), Some(todo_month), Some(todo_year)) => {
                todo_month.to_string() == month && todo_year.to_string() == year
            }
            _ => false,
        },
    }
}
