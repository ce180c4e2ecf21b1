use crate::model::{ALL_TODOS, COMPLETED, Todo};
use crate::selection::DueTodo;
use crate::view::ViewModel;
use chrono::{Datelike, Local};

const YEAR_SPAN: i32 = 5;

pub fn render_page(view: &ViewModel<'_>, notice: Option<&str>) -> String {
    render_page_at(view, notice, Local::now().year())
}

pub fn render_page_at(view: &ViewModel<'_>, notice: Option<&str>, current_year: i32) -> String {
    let notice = notice
        .map(|message| format!(r#"<p class="notice" role="alert">{}</p>"#, escape(message)))
        .unwrap_or_default();

    INDEX_HTML
        .replace("{{NOTICE}}", &notice)
        .replace("{{SIDEBAR}}", &render_sidebar(view))
        .replace("{{TITLE}}", &escape(&view.current_section.title))
        .replace("{{COUNT}}", &view.current_section.count.to_string())
        .replace("{{ITEMS}}", &render_items(&view.selected, current_year))
        .replace(
            "{{NEW_FORM}}",
            &render_todo_form("/todos", "/draft/complete", None, current_year),
        )
}

struct NavEntry<'a> {
    title: &'a str,
    count: usize,
    completed: bool,
}

fn nav_entries<'a>(view: &'a ViewModel<'_>) -> Vec<NavEntry<'a>> {
    let mut entries = vec![NavEntry {
        title: ALL_TODOS,
        count: view.todos.len(),
        completed: false,
    }];
    entries.extend(view.todos_by_date.iter().map(|(key, todos)| NavEntry {
        title: key,
        count: todos.len(),
        completed: false,
    }));
    entries.push(NavEntry {
        title: COMPLETED,
        count: view.done.len(),
        completed: true,
    });
    entries.extend(view.done_todos_by_date.iter().map(|(key, todos)| NavEntry {
        title: key,
        count: todos.len(),
        completed: true,
    }));
    entries
}

/// Completed sub-lists highlight the last matching entry, everything else the first.
/// An unknown selection highlights "All Todos".
fn active_entry(entries: &[NavEntry<'_>], view: &ViewModel<'_>) -> usize {
    let mut matches = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.title == view.selection.select)
        .map(|(index, _)| index);
    let found = if view.selection.completed {
        matches.last()
    } else {
        matches.next()
    };
    found.unwrap_or(0)
}

fn render_sidebar(view: &ViewModel<'_>) -> String {
    let entries = nav_entries(view);
    let active = active_entry(&entries, view);
    let mut html = String::new();

    for (index, entry) in entries.iter().enumerate() {
        if entry.title == COMPLETED && entry.completed {
            html.push_str(r#"<hr class="nav-group" />"#);
        }
        let class = match (index == active, entry.title == ALL_TODOS || entry.title == COMPLETED) {
            (true, true) => "nav header active",
            (true, false) => "nav active",
            (false, true) => "nav header",
            (false, false) => "nav",
        };
        html.push_str(&format!(
            r#"<form method="get" action="/view" class="{class}"><input type="hidden" name="select" value="{title}" /><input type="hidden" name="completed" value="{completed}" /><button type="submit" data-title="{title}">{title}<span class="count">{count}</span></button></form>"#,
            title = escape(entry.title),
            completed = entry.completed,
            count = entry.count,
        ));
    }
    html
}

fn render_items(selected: &[DueTodo<'_>], current_year: i32) -> String {
    if selected.is_empty() {
        return r#"<li class="empty">Nothing here.</li>"#.to_string();
    }

    let mut html = String::new();
    for entry in selected {
        let todo = entry.todo;
        let (state, mark) = if todo.completed {
            ("todo done", "&#10003;")
        } else {
            ("todo", "&#9675;")
        };
        let form = render_todo_form(
            &format!("/todos/{}", todo.id),
            &format!("/todos/{}/complete", todo.id),
            Some(todo),
            current_year,
        );
        html.push_str(&format!(
            r#"<li class="{state}" data-id="{id}">
  <form method="post" action="/todos/{id}/toggle"><button class="check" type="submit" aria-label="Toggle complete">{mark}</button></form>
  <details><summary><span class="title">{title}</span> <span class="due">{due}</span></summary>{form}</details>
  <form method="post" action="/todos/{id}/delete"><button class="delete" type="submit">Delete</button></form>
</li>
"#,
            id = todo.id,
            title = escape(&todo.title),
            due = escape(&entry.due_date),
        ));
    }
    html
}

fn render_todo_form(save: &str, complete: &str, todo: Option<&Todo>, current_year: i32) -> String {
    let title = todo.map(|todo| escape(&todo.title)).unwrap_or_default();
    let description = todo.map(|todo| escape(&todo.description)).unwrap_or_default();
    let month = todo.and_then(|todo| todo.month);
    let year = todo.and_then(|todo| todo.year);

    let mut months = String::from(r#"<option value="">Month</option>"#);
    for value in 1..=12u32 {
        months.push_str(&format!(
            r#"<option value="{value:02}"{selected}>{value:02}</option>"#,
            selected = selected_attr(month == Some(value)),
        ));
    }

    let mut years: Vec<i32> = (current_year - YEAR_SPAN..=current_year + YEAR_SPAN).collect();
    if let Some(year) = year.filter(|year| !years.contains(year)) {
        years.push(year);
        years.sort_unstable();
    }
    let mut year_options = String::from(r#"<option value="">Year</option>"#);
    for value in years {
        year_options.push_str(&format!(
            r#"<option value="{value}"{selected}>{value}</option>"#,
            selected = selected_attr(year == Some(value)),
        ));
    }

    format!(
        r#"<form method="post" action="{save}" class="todo-form">
  <input type="text" name="title" value="{title}" placeholder="Item 1" />
  <select name="due_month">{months}</select>
  <select name="due_year">{year_options}</select>
  <textarea name="description" placeholder="Description">{description}</textarea>
  <div class="form-actions">
    <button type="submit">Save</button>
    <button type="submit" name="complete" formaction="{complete}">Mark As Complete</button>
  </div>
</form>"#
    )
}

fn selected_attr(selected: bool) -> &'static str {
    if selected { " selected" } else { "" }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            // Keeps user text from forming template placeholders.
            '{' => escaped.push_str("&#123;"),
            '}' => escaped.push_str("&#125;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Todo Board</title>
  <style>
    :root {
      --bg: #f8f3e6;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --muted: #8b857d;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      grid-template-columns: 280px 1fr;
    }

    #sidebar {
      background: var(--accent-2);
      color: white;
      padding: 24px 16px;
    }

    .nav button {
      width: 100%;
      display: flex;
      justify-content: space-between;
      background: transparent;
      border: none;
      color: inherit;
      font: inherit;
      padding: 8px 12px;
      border-radius: 10px;
      cursor: pointer;
    }

    .nav.header button {
      font-weight: 600;
      font-size: 1.1rem;
    }

    .nav.active button {
      background: rgba(255, 255, 255, 0.18);
    }

    .nav-group {
      margin: 24px 0 8px;
      border: none;
      border-top: 1px solid rgba(255, 255, 255, 0.25);
    }

    .count {
      background: rgba(255, 255, 255, 0.2);
      border-radius: 999px;
      padding: 0 10px;
    }

    main {
      padding: 36px;
      display: grid;
      gap: 20px;
      align-content: start;
    }

    h1 {
      margin: 0;
    }

    h1 .count {
      background: var(--accent);
      color: white;
      font-size: 1rem;
      vertical-align: middle;
    }

    .notice {
      margin: 0;
      padding: 12px 16px;
      border-radius: 12px;
      background: #fde2dc;
      color: #c63b2b;
    }

    ul {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 8px;
    }

    .todo {
      display: grid;
      grid-template-columns: auto 1fr auto;
      gap: 12px;
      align-items: start;
      background: white;
      border-radius: 14px;
      padding: 12px 16px;
    }

    .todo.done .title {
      text-decoration: line-through;
      color: var(--muted);
    }

    .due {
      color: var(--muted);
      font-size: 0.9rem;
    }

    .todo-form {
      display: grid;
      gap: 8px;
      margin-top: 12px;
    }

    .form-actions {
      display: flex;
      gap: 8px;
    }
  </style>
</head>
<body>
  <nav id="sidebar">
    {{SIDEBAR}}
  </nav>
  <main>
    {{NOTICE}}
    <h1>{{TITLE}} <span class="count">{{COUNT}}</span></h1>
    <details class="add-todo">
      <summary>Add new to do</summary>
      {{NEW_FORM}}
    </details>
    <ul id="items">
      {{ITEMS}}
    </ul>
  </main>
</body>
</html>
"#;
