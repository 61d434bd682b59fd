/// Tri-state field update for nullable columns
///
/// A plain `Option<T>` cannot tell "leave this column alone" apart from
/// "set this column to NULL". `Patch<T>` makes the three cases explicit:
///
/// | JSON input          | Value         | Effect               |
/// |---------------------|---------------|----------------------|
/// | field missing       | `Keep`        | column untouched     |
/// | `"field": null`     | `Clear`       | column set to NULL   |
/// | `"field": value`    | `Set(value)`  | column overwritten   |
///
/// Fields of this type must be annotated with `#[serde(default)]` so that a
/// missing key deserializes to `Keep`.
///
/// # Example
///
/// ```
/// use tasklane_shared::models::patch::Patch;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Changes {
///     #[serde(default)]
///     note: Patch<String>,
/// }
///
/// let missing: Changes = serde_json::from_str("{}").unwrap();
/// assert!(missing.note.is_keep());
///
/// let cleared: Changes = serde_json::from_str(r#"{"note": null}"#).unwrap();
/// assert_eq!(cleared.note, Patch::Clear);
/// ```

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Leave the stored value unchanged
    Keep,

    /// Overwrite the stored value
    Set(T),

    /// Store NULL
    Clear,
}

impl<T> Patch<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Patch::Keep)
    }

    /// Borrows the new value, if one is being set
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Patch::Set(value) => Some(value),
            _ => None,
        }
    }

    /// Converts into the column write it describes
    ///
    /// `None` means no write; `Some(None)` writes NULL.
    pub fn into_write(self) -> Option<Option<T>> {
        match self {
            Patch::Keep => None,
            Patch::Set(value) => Some(Some(value)),
            Patch::Clear => Some(None),
        }
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Keep
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Patch::Set(value),
            None => Patch::Clear,
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only reached when the key is present; a missing key takes the default.
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}
