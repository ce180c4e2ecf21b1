use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

pub const ALL_TODOS: &str = "All Todos";
pub const COMPLETED: &str = "Completed";
pub const NO_DUE_DATE: &str = "No Due Date";

pub type TodoId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub month: Option<u32>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub year: Option<i32>,
    #[serde(default)]
    pub completed: bool,
}

impl Todo {
    pub fn new(id: TodoId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            month: None,
            year: None,
            completed: false,
        }
    }

    pub fn due(mut self, month: u32, year: i32) -> Self {
        self.month = Some(month);
        self.year = Some(year);
        self
    }

    pub fn done(mut self) -> Self {
        self.completed = true;
        self
    }

    /// Both halves must be present; a lone month or year counts as undated.
    pub fn due_parts(&self) -> Option<(u32, i32)> {
        self.month.zip(self.year)
    }

    pub fn is_dated(&self) -> bool {
        self.due_parts().is_some()
    }

    /// Bucket key for dated todos, e.g. `3/2024`.
    pub fn due_key(&self) -> Option<String> {
        self.due_parts()
            .map(|(month, year)| format!("{month}/{year}"))
    }

    pub fn due_date(&self) -> String {
        self.due_key().unwrap_or_else(|| NO_DUE_DATE.to_string())
    }
}

/// The active navigation choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub select: String,
    #[serde(default)]
    pub completed: bool,
}

impl Selection {
    pub fn new(select: impl Into<String>, completed: bool) -> Self {
        Self {
            select: select.into(),
            completed,
        }
    }

    pub fn all() -> Self {
        Self::new(ALL_TODOS, false)
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::all()
    }
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(i64),
    Text(String),
}

// The service hands dates back as numbers or as the raw form strings ("03", "").
fn lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + TryFrom<i64>,
{
    let value = match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(n)) => T::try_from(n).ok(),
        Some(NumberOrText::Text(text)) => text.trim().parse().ok(),
        None => None,
    };
    Ok(value)
}
