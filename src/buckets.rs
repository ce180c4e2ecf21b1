use crate::model::{NO_DUE_DATE, Todo};
use indexmap::IndexMap;

/// Bucket key to todos, in first-seen order of the due-date sort.
pub type DateBuckets<'a> = IndexMap<String, Vec<&'a Todo>>;

// month + 13 * year keeps cross-year comparisons monotonic.
fn due_rank(todo: &Todo) -> (bool, i64) {
    match todo.due_parts() {
        Some((month, year)) => (false, i64::from(month) + 13 * i64::from(year)),
        None => (true, 0),
    }
}

/// Stable sort: dated todos by due month, then undated ones in their original order.
pub fn sort_by_due_order(todos: &[Todo]) -> Vec<&Todo> {
    let mut sorted: Vec<&Todo> = todos.iter().collect();
    sorted.sort_by_key(|todo| due_rank(todo));
    sorted
}

pub fn bucket_by_date(todos: &[Todo]) -> DateBuckets<'_> {
    let mut buckets = DateBuckets::new();
    for todo in sort_by_due_order(todos) {
        let key = todo.due_key().unwrap_or_else(|| NO_DUE_DATE.to_string());
        buckets.entry(key).or_default().push(todo);
    }
    buckets
}

/// Same grouping restricted to completed todos; buckets without any are left out.
pub fn bucket_completed_by_date(todos: &[Todo]) -> DateBuckets<'_> {
    bucket_by_date(todos)
        .into_iter()
        .filter_map(|(key, bucket)| {
            let done: Vec<&Todo> = bucket.into_iter().filter(|todo| todo.completed).collect();
            (!done.is_empty()).then_some((key, done))
        })
        .collect()
}
