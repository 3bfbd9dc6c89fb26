//! The `RealtimeStore` trait and supporting path/subscription types.
//!
//! The trait is implemented by storage backends (e.g. `crm-store-memory`).
//! The synchronization layers in `crm-sync` depend on this abstraction, not
//! on any concrete backend.
//!
//! The store is a multi-writer, no-lock, eventually-consistent shared
//! resource: concurrent writes to the same field resolve to whichever lands
//! last, and a client must not assume its own write is visible on its
//! subscription before the echo actually arrives.

use std::{fmt, future::Future};

use serde_json::{Map, Value};
use tokio::sync::mpsc;

use crate::Result;

// ─── Paths ───────────────────────────────────────────────────────────────────

/// A slash-separated location in the store tree, e.g. `tasks/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorePath(Vec<String>);

impl StorePath {
  pub fn new(root: impl Into<String>) -> Self { Self(vec![root.into()]) }

  /// Extend the path by one segment.
  pub fn child(mut self, segment: impl Into<String>) -> Self {
    self.0.push(segment.into());
    self
  }

  pub fn segments(&self) -> &[String] { &self.0 }

  /// True when `self` equals `other` or is an ancestor of it.
  pub fn contains(&self, other: &StorePath) -> bool {
    other.0.len() >= self.0.len()
      && self.0.iter().zip(&other.0).all(|(a, b)| a == b)
  }
}

impl fmt::Display for StorePath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0.join("/"))
  }
}

// ─── Snapshots and subscriptions ─────────────────────────────────────────────

/// A full, point-in-time copy of the subtree a read or subscription covers.
pub type Snapshot = Value;

/// Handle for a continuous subscription.
///
/// The store re-delivers the entire covered subtree on every change beneath
/// the subscribed path, starting with one snapshot at attach time. Dropping
/// the handle detaches the listener — subscriptions are not process-lifetime.
pub struct Subscription {
  rx: mpsc::UnboundedReceiver<Snapshot>,
}

impl Subscription {
  pub fn new(rx: mpsc::UnboundedReceiver<Snapshot>) -> Self { Self { rx } }

  /// The next snapshot, or `None` once the store side has gone away.
  pub async fn next(&mut self) -> Option<Snapshot> { self.rx.recv().await }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the keyed, hierarchical remote document store.
///
/// All operations are non-blocking round-trips. Within one subscription,
/// snapshots arrive in store-determined order; nothing is guaranteed across
/// independent subscriptions.
///
/// All methods return `Send` futures so the trait can be used from
/// multi-threaded async runtimes.
pub trait RealtimeStore: Send + Sync {
  /// One-shot read. `Ok(None)` when nothing exists at `path`.
  fn get<'a>(
    &'a self,
    path: &'a StorePath,
  ) -> impl Future<Output = Result<Option<Snapshot>>> + Send + 'a;

  /// Replace the value at `path` wholesale.
  fn set<'a>(
    &'a self,
    path: &'a StorePath,
    value: Value,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  /// Merge `fields` into the object at `path`, creating it if absent.
  /// Fields not named are left untouched.
  fn update<'a>(
    &'a self,
    path: &'a StorePath,
    fields: Map<String, Value>,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  /// Delete the value at `path`. Deleting a missing path is not an error.
  fn remove<'a>(
    &'a self,
    path: &'a StorePath,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  /// Allocate a fresh key under `path`, write `value` there, and return the
  /// generated key.
  fn push<'a>(
    &'a self,
    path: &'a StorePath,
    value: Value,
  ) -> impl Future<Output = Result<String>> + Send + 'a;

  /// Open a continuous subscription covering the subtree at `path`.
  fn subscribe<'a>(
    &'a self,
    path: &'a StorePath,
  ) -> impl Future<Output = Result<Subscription>> + Send + 'a;
}
