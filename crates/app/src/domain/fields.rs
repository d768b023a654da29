//! Partial update fields

/// How an optional column changes during an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    /// Leave the stored value alone.
    #[default]
    Keep,

    /// Reset the stored value to `NULL`.
    Clear,

    /// Replace the stored value.
    Set(T),
}

impl FieldUpdate<String> {
    /// Interpret an optional text field from a request body: omitted keeps the
    /// current value, an empty string clears it, anything else replaces it.
    #[must_use]
    pub fn from_text(value: Option<String>) -> Self {
        match value {
            None => Self::Keep,
            Some(value) if value.trim().is_empty() => Self::Clear,
            Some(value) => Self::Set(value),
        }
    }
}

impl<T> FieldUpdate<T> {
    /// Resolve against the current value.
    #[must_use]
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Self::Keep => current,
            Self::Clear => None,
            Self::Set(value) => Some(value),
        }
    }
}
