//! Encoding and decoding between the wire representation and typed records.
//!
//! The wire format is untyped JSON maps with epoch-second timestamps. A
//! collection snapshot maps store keys to document payloads; identity fields
//! carried in the key are injected into the decoded record here.
//!
//! Decode policy for collections: a member with a missing or mistyped field
//! is dropped, never fatal to its siblings. The drop is counted and reported
//! through a `tracing` diagnostic so partially-written documents do not
//! vanish entirely without trace.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
  Error, Result, event::CalendarEvent, post::Post, task::Task, user::User,
};

// ─── Epoch-second timestamps ─────────────────────────────────────────────────

/// Serde adapter for date fields stored as seconds-since-epoch numbers.
///
/// Decoding accepts both integral and fractional values; encoding emits a
/// fractional value with microsecond precision. Sub-microsecond precision is
/// discarded at reconstruction — the store value is the source of truth.
pub mod epoch_seconds {
  use chrono::{DateTime, Utc};
  use serde::{Deserialize, Deserializer, Serializer, de};

  pub fn serialize<S: Serializer>(
    dt: &DateTime<Utc>,
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(dt.timestamp_micros() as f64 / 1e6)
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
  ) -> Result<DateTime<Utc>, D::Error> {
    let seconds = f64::deserialize(deserializer)?;
    let micros = (seconds * 1e6).round();
    if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
      return Err(de::Error::custom("epoch-seconds timestamp out of range"));
    }
    DateTime::from_timestamp_micros(micros as i64)
      .ok_or_else(|| de::Error::custom("epoch-seconds timestamp out of range"))
  }
}

// ─── Collection decoding ─────────────────────────────────────────────────────

/// A decoded collection snapshot plus the count of members that failed to
/// decode and were dropped.
#[derive(Debug, Clone)]
pub struct Decoded<T> {
  pub items:   Vec<T>,
  pub dropped: usize,
}

/// Decode every member of a snapshot map, injecting the store key via
/// `with_key`. Key order (and therefore output order) is the snapshot's own
/// member order.
fn decode_map<T, F>(
  snapshot: &Value,
  collection: &'static str,
  mut with_key: F,
) -> Decoded<T>
where
  T: DeserializeOwned,
  F: FnMut(&str, &mut T),
{
  let Some(map) = snapshot.as_object() else {
    return Decoded { items: Vec::new(), dropped: 0 };
  };

  let mut items = Vec::with_capacity(map.len());
  let mut dropped = 0;
  for (key, value) in map {
    match serde_json::from_value::<T>(value.clone()) {
      Ok(mut item) => {
        with_key(key, &mut item);
        items.push(item);
      }
      Err(_) => dropped += 1,
    }
  }

  if dropped > 0 {
    tracing::warn!(collection, dropped, "dropped malformed snapshot members");
  }
  Decoded { items, dropped }
}

pub fn decode_tasks(snapshot: &Value) -> Decoded<Task> {
  decode_map(snapshot, "tasks", |key, task: &mut Task| {
    task.id = Some(key.to_owned());
  })
}

pub fn decode_posts(snapshot: &Value) -> Decoded<Post> {
  decode_map(snapshot, "posts", |key, post: &mut Post| {
    post.id = Some(key.to_owned());
  })
}

/// Event ids travel in the payload, so there is nothing to inject.
pub fn decode_events(snapshot: &Value) -> Decoded<CalendarEvent> {
  decode_map(snapshot, "calendarEvents", |_, _| {})
}

pub fn decode_users(snapshot: &Value) -> Decoded<User> {
  decode_map(snapshot, "users", |key, user: &mut User| {
    user.id = key.to_owned();
  })
}

// ─── Single documents ────────────────────────────────────────────────────────

/// Decode one profile document. Unlike collection members there is no
/// sibling set to fall back to, so a malformed document is an error.
pub fn decode_user(uid: &str, value: &Value) -> Result<User> {
  let mut user: User = serde_json::from_value(value.clone())
    .map_err(|_| Error::ProfileUnavailable(uid.to_owned()))?;
  user.id = uid.to_owned();
  Ok(user)
}

// ─── Encoding ────────────────────────────────────────────────────────────────

pub fn encode_task(task: &Task) -> Result<Value> {
  serde_json::to_value(task)
    .map_err(|source| Error::Encoding { entity: "task", source })
}

pub fn encode_post(post: &Post) -> Result<Value> {
  serde_json::to_value(post)
    .map_err(|source| Error::Encoding { entity: "post", source })
}

pub fn encode_event(event: &CalendarEvent) -> Result<Value> {
  serde_json::to_value(event)
    .map_err(|source| Error::Encoding { entity: "calendar event", source })
}

pub fn encode_user(user: &User) -> Result<Value> {
  serde_json::to_value(user)
    .map_err(|source| Error::Encoding { entity: "user", source })
}
