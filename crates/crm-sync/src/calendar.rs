//! Calendar synchronization layer.

use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crm_core::{
  Result, codec,
  event::CalendarEvent,
  projection,
  store::{RealtimeStore, StorePath, Subscription},
};

pub struct CalendarSync<S> {
  store: Arc<S>,
  root:  StorePath,
}

impl<S: RealtimeStore> CalendarSync<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self { store, root: StorePath::new("calendarEvents") }
  }

  /// Continuous feed of the event collection, grouped by UTC calendar day.
  pub async fn subscribe(&self) -> Result<EventFeed> {
    let sub = self.store.subscribe(&self.root).await?;
    Ok(EventFeed { sub })
  }

  /// Write a new event with a client-generated id; the document key equals
  /// the id. Returns the event as written.
  pub async fn create(
    &self,
    title: &str,
    date: DateTime<Utc>,
  ) -> Result<CalendarEvent> {
    let event = CalendarEvent {
      id: Uuid::new_v4().to_string(),
      title: title.to_owned(),
      date,
    };
    let value = codec::encode_event(&event)?;
    self
      .store
      .set(&self.root.clone().child(event.id.clone()), value)
      .await?;
    Ok(event)
  }

  pub async fn delete(&self, event: &CalendarEvent) -> Result<()> {
    self.store.remove(&self.root.clone().child(event.id.as_str())).await
  }
}

/// Grouped view over an event-collection subscription. Dropping the feed
/// detaches the underlying listener.
pub struct EventFeed {
  sub: Subscription,
}

impl EventFeed {
  /// The next snapshot grouped by day, or `None` when the store has gone
  /// away. Malformed members are dropped, never fatal.
  pub async fn next(
    &mut self,
  ) -> Option<BTreeMap<NaiveDate, Vec<CalendarEvent>>> {
    let snapshot = self.sub.next().await?;
    Some(projection::group_by_day(codec::decode_events(&snapshot).items))
  }
}
