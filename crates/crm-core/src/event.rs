//! Calendar events — the `calendarEvents` collection.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::codec::epoch_seconds;

/// A calendar event. Unlike tasks and posts the id is generated client-side
/// before the first write and carried inside the payload; the document key
/// equals it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
  pub id:    String,
  pub title: String,
  #[serde(with = "epoch_seconds")]
  pub date:  DateTime<Utc>,
}

impl CalendarEvent {
  /// The UTC calendar day this event groups under for display.
  pub fn day(&self) -> NaiveDate { self.date.date_naive() }
}
