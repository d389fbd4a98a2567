use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a task as handed over by the portal backend.
///
/// The backend emits numeric ids for most records and string ids for a few
/// imported ones, so both shapes are accepted. Ids compare exactly: `1` and
/// `"1"` are different tasks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Number(i64),
    Text(String),
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Number(n) => write!(f, "{n}"),
            TaskId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for TaskId {
    type Err = std::convert::Infallible;

    /// All-digit tokens become numeric ids, anything else is kept as text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.parse::<i64>() {
            Ok(n) => TaskId::Number(n),
            Err(_) => TaskId::Text(trimmed.to_string()),
        })
    }
}

impl From<i64> for TaskId {
    fn from(value: i64) -> Self {
        TaskId::Number(value)
    }
}

impl From<i32> for TaskId {
    fn from(value: i32) -> Self {
        TaskId::Number(i64::from(value))
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        TaskId::Text(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        TaskId::Text(value)
    }
}

/// A dated task on the project timeline.
///
/// `dependencies` are finish-to-start: every listed task must finish before
/// this one may start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            name: None,
            start_date,
            end_date,
            dependencies: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_dependencies<I, T>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TaskId>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Inclusive day count: a task that starts and ends on the same day lasts
    /// one day. Inverted ranges yield zero or negative values.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn has_valid_range(&self) -> bool {
        self.end_date >= self.start_date
    }
}
