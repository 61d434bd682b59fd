/// Todo entity
///
/// A todo is a task owned by exactly one user. This module holds the record
/// type, its priority enum, and the create/update inputs with their field
/// constraints. Persistence lives in [`crate::services::todo`].
///
/// # Completion invariant
///
/// `completed_at` is set if and only if `is_complete` is true. Every write
/// that touches `is_complete` also writes `completed_at` in the same
/// statement, and the table enforces it with a CHECK constraint.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE todo (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title TEXT NOT NULL CHECK (char_length(title) BETWEEN 1 AND 255),
///     description TEXT CHECK (char_length(description) <= 2000),
///     is_complete BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     completed_at TIMESTAMPTZ,
///     priority VARCHAR(20) NOT NULL DEFAULT 'MEDIUM',
///     due_date TIMESTAMPTZ,
///     reminder_enabled BOOLEAN NOT NULL DEFAULT FALSE,
///     reminder_time TEXT CHECK (char_length(reminder_time) <= 20)
/// );
/// ```

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use super::patch::Patch;

/// Column list shared by every `todo` query
pub(crate) const TODO_COLUMNS: &str = "id, user_id, title, description, is_complete, \
    created_at, updated_at, completed_at, priority, due_date, reminder_enabled, reminder_time";

pub const TITLE_MAX_CHARS: u64 = 255;
pub const DESCRIPTION_MAX_CHARS: u64 = 2000;
pub const REMINDER_TIME_MAX_CHARS: u64 = 20;

/// Todo priority
///
/// Stored and serialized as the uppercase variant name. Parsing is
/// case-insensitive for both database rows and request bodies, so `"medium"`
/// written by older clients still loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Converts priority to its stored form
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored or supplied priority is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown priority: {0}")]
pub struct PriorityParseError(pub String);

impl FromStr for Priority {
    type Err = PriorityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(Priority::Low),
            "MEDIUM" => Ok(Priority::Medium),
            "HIGH" => Ok(Priority::High),
            _ => Err(PriorityParseError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Priority {
    type Error = PriorityParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Todo record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    /// Unique todo ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Title, 1–255 characters
    pub title: String,

    /// Optional description, at most 2000 characters
    pub description: Option<String>,

    /// Completion flag
    pub is_complete: bool,

    pub created_at: DateTime<Utc>,

    /// Refreshed on every successful update or toggle
    pub updated_at: DateTime<Utc>,

    /// When the todo was completed; `None` while incomplete
    pub completed_at: Option<DateTime<Utc>>,

    #[sqlx(try_from = "String")]
    pub priority: Priority,

    pub due_date: Option<DateTime<Utc>>,

    pub reminder_enabled: bool,

    /// Reminder lead time before `due_date`, e.g. "1 day" or "2 hours"
    pub reminder_time: Option<String>,
}

impl Todo {
    /// Checks the completion invariant on a loaded record
    pub fn completion_is_consistent(&self) -> bool {
        self.completed_at.is_some() == self.is_complete
    }
}

/// Returns the `completed_at` value matching a completion flag
pub fn completion_timestamp(is_complete: bool, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    is_complete.then_some(now)
}

/// Input for creating a todo
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTodo {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub reminder_enabled: bool,

    #[validate(length(max = 20, message = "Reminder time must be at most 20 characters"))]
    #[serde(default)]
    pub reminder_time: Option<String>,
}

impl CreateTodo {
    /// Creates input with only a title; every other field takes its default
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: Priority::default(),
            due_date: None,
            reminder_enabled: false,
            reminder_time: None,
        }
    }
}

/// Input for a partial update
///
/// Non-nullable columns use `Option<T>` (`None` = unchanged). Nullable columns
/// use [`Patch<T>`] so that clearing a value is distinct from leaving it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodo {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Patch<String>,

    /// Also sets or clears `completed_at`
    #[serde(default)]
    pub is_complete: Option<bool>,

    #[serde(default)]
    pub priority: Option<Priority>,

    #[serde(default)]
    pub due_date: Patch<DateTime<Utc>>,

    #[serde(default)]
    pub reminder_enabled: Option<bool>,

    #[serde(default)]
    pub reminder_time: Patch<String>,
}

impl UpdateTodo {
    /// True when no field is supplied; such an update only refreshes `updated_at`
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_keep()
            && self.is_complete.is_none()
            && self.priority.is_none()
            && self.due_date.is_keep()
            && self.reminder_enabled.is_none()
            && self.reminder_time.is_keep()
    }
}

fn length_error(min: Option<u64>, max: u64, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new("length");
    if let Some(min) = min {
        error.add_param(Cow::from("min"), &min);
    }
    error.add_param(Cow::from("max"), &max);
    error.message = Some(Cow::from(message));
    error
}

fn char_count(value: &str) -> u64 {
    value.chars().count() as u64
}

impl Validate for UpdateTodo {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(title) = &self.title {
            let len = char_count(title);
            if len == 0 || len > TITLE_MAX_CHARS {
                errors.add(
                    "title",
                    length_error(Some(1), TITLE_MAX_CHARS, "Title must be between 1 and 255 characters"),
                );
            }
        }

        if let Some(description) = self.description.as_set() {
            if char_count(description) > DESCRIPTION_MAX_CHARS {
                errors.add(
                    "description",
                    length_error(None, DESCRIPTION_MAX_CHARS, "Description must be at most 2000 characters"),
                );
            }
        }

        if let Some(reminder_time) = self.reminder_time.as_set() {
            if char_count(reminder_time) > REMINDER_TIME_MAX_CHARS {
                errors.add(
                    "reminder_time",
                    length_error(None, REMINDER_TIME_MAX_CHARS, "Reminder time must be at most 20 characters"),
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
