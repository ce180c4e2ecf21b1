use crate::errors::IntentError;
use indexmap::IndexMap;

pub type FormFields = IndexMap<String, String>;

pub const MIN_TITLE_CHARS: usize = 3;
const DUE_PREFIX: &str = "due_";

/// Rewrites raw form fields into the body the todo service expects.
///
/// `due_month=03` becomes `month=03`; a date subfield without any digit
/// (such as the empty "--" choice) is sent as an empty string.
pub fn sanitize(fields: &FormFields) -> FormFields {
    fields
        .iter()
        .map(|(name, value)| match name.strip_prefix(DUE_PREFIX) {
            Some(stripped) => {
                let value = if value.chars().any(|c| c.is_ascii_digit()) {
                    value.clone()
                } else {
                    String::new()
                };
                (stripped.to_string(), value)
            }
            None => (name.clone(), value.clone()),
        })
        .collect()
}

pub fn validate_title(fields: &FormFields) -> Result<(), IntentError> {
    let visible = fields
        .get("title")
        .map(|title| title.chars().filter(|c| !c.is_whitespace()).count())
        .unwrap_or(0);
    if visible < MIN_TITLE_CHARS {
        return Err(IntentError::InvalidTitle);
    }
    Ok(())
}
