//! Tasks — the `tasks` collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::codec::epoch_seconds;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
  Active,
  Completed,
  /// Modeled and accepted on the wire, but no exposed operation transitions
  /// a task here.
  Archived,
}

impl TaskStatus {
  /// The wire string stored in the `status` field.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Active => "active",
      Self::Completed => "completed",
      Self::Archived => "archived",
    }
  }
}

/// A task document. Wire field names are camelCase; `id` is the
/// store-assigned collection key, absent from the payload and `None` until
/// the task is first persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
  #[serde(skip)]
  pub id:                Option<String>,
  pub title:             String,
  pub description:       String,
  #[serde(with = "epoch_seconds")]
  pub due_date:          DateTime<Utc>,
  pub status:            TaskStatus,
  /// May reference zero or more profile ids; referential integrity is not
  /// enforced anywhere.
  pub assigned_user_ids: Vec<String>,
}

impl Task {
  /// Strictly past due: a task due exactly at `now` is not yet overdue.
  pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
    self.status == TaskStatus::Active && self.due_date < now
  }
}
