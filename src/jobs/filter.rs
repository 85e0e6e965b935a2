use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::jobs::job::{Job, JobPriority, JobStatus};

/// A single-field predicate: either everything, or one concrete value.
///
/// Serialized as `"all"` or as the value's own string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter<T> {
    All,
    Only(T),
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Filter::All
    }
}

impl<T: PartialEq> Filter<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(expected) => expected == value,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => write!(f, "all"),
            Filter::Only(value) => value.fmt(f),
        }
    }
}

impl<T: FromStr> FromStr for Filter<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(Filter::All)
        } else {
            s.parse().map(Filter::Only)
        }
    }
}

impl<T: fmt::Display> Serialize for Filter<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T> Deserialize<'de> for Filter<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// The active view predicate. Both fields are AND-combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFilters {
    pub status: Filter<JobStatus>,
    pub priority: Filter<JobPriority>,
}

impl JobFilters {
    pub fn matches(&self, job: &Job) -> bool {
        self.status.matches(&job.status) && self.priority.matches(&job.priority)
    }

    /// Apply a partial update; absent fields keep their current value.
    pub fn merge(&mut self, update: JobFiltersUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFiltersUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Filter<JobStatus>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Filter<JobPriority>>,
}

impl JobFiltersUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.priority.is_none()
    }
}
