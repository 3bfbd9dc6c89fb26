//! Pure display projections.
//!
//! Everything here is recomputed deterministically from a published
//! collection plus transient UI inputs (search text, filter selection,
//! the current instant). No hidden state.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use strum::EnumIter;

use crate::{
  event::CalendarEvent,
  task::{Task, TaskStatus},
  user::User,
};

/// Status filter selected in the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter)]
pub enum TaskFilter {
  #[default]
  All,
  Active,
  Completed,
  Overdue,
}

impl TaskFilter {
  fn matches(self, task: &Task, now: DateTime<Utc>) -> bool {
    match self {
      Self::All => true,
      Self::Active => task.status == TaskStatus::Active,
      Self::Completed => task.status == TaskStatus::Completed,
      Self::Overdue => task.is_overdue(now),
    }
  }
}

/// Recompute the on-screen task list: case-insensitive substring match on
/// title or description, status filter, then a stable ascending sort by due
/// date (ties keep the input order).
pub fn project_tasks(
  tasks: &[Task],
  search: &str,
  filter: TaskFilter,
  now: DateTime<Utc>,
) -> Vec<Task> {
  let needle = search.trim().to_lowercase();
  let mut result: Vec<Task> = tasks
    .iter()
    .filter(|task| {
      let text_match = needle.is_empty()
        || task.title.to_lowercase().contains(&needle)
        || task.description.to_lowercase().contains(&needle);
      text_match && filter.matches(task, now)
    })
    .cloned()
    .collect();
  result.sort_by_key(|task| task.due_date);
  result
}

/// Case-insensitive name-or-email filter for the user directory screen.
pub fn filter_users(users: &[User], search: &str) -> Vec<User> {
  let needle = search.trim().to_lowercase();
  if needle.is_empty() {
    return users.to_vec();
  }
  users
    .iter()
    .filter(|user| {
      user.name.to_lowercase().contains(&needle)
        || user.email.to_lowercase().contains(&needle)
    })
    .cloned()
    .collect()
}

/// Group events under their UTC calendar day. Events on the same day share
/// one key regardless of time-of-day; order within a day is not meaningful.
pub fn group_by_day(
  events: Vec<CalendarEvent>,
) -> BTreeMap<NaiveDate, Vec<CalendarEvent>> {
  let mut days: BTreeMap<NaiveDate, Vec<CalendarEvent>> = BTreeMap::new();
  for event in events {
    days.entry(event.day()).or_default().push(event);
  }
  days
}
