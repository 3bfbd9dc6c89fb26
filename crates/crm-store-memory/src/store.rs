//! [`MemoryStore`] — the in-memory implementation of [`RealtimeStore`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value};
use tokio::sync::mpsc;
use uuid::Uuid;

use crm_core::{
  Error, Result,
  store::{RealtimeStore, Snapshot, StorePath, Subscription},
};

/// An in-process store tree with snapshot fan-out.
///
/// Cloning is cheap — clones share the same tree and watcher registry, so a
/// test can hold one handle while the code under test holds another.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
  root:          Value,
  watchers:      Vec<Watcher>,
  fail_prefixes: Vec<StorePath>,
}

struct Watcher {
  path: StorePath,
  tx:   mpsc::UnboundedSender<Snapshot>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Make every write (set/update/remove/push) beneath `prefix` fail with a
  /// store write error. Test hook for exercising partial-failure paths.
  pub fn fail_writes_under(&self, prefix: StorePath) {
    self.lock().fail_prefixes.push(prefix);
  }

  /// Clear all injected write failures.
  pub fn clear_write_failures(&self) { self.lock().fail_prefixes.clear(); }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    // Lock poisoning only matters if a writer panicked mid-mutation; the
    // tree is still structurally valid JSON, so carry on.
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl Inner {
  fn check_writable(&self, path: &StorePath) -> Result<()> {
    for prefix in &self.fail_prefixes {
      if prefix.contains(path) {
        return Err(Error::Write(format!("injected failure under {prefix}")));
      }
    }
    Ok(())
  }

  /// Send each affected watcher a fresh snapshot of its subtree and prune
  /// watchers whose receiving side is gone.
  fn notify(&mut self, changed: &StorePath) {
    let root = &self.root;
    self.watchers.retain(|watcher| {
      if !watcher.path.contains(changed) && !changed.contains(&watcher.path) {
        return !watcher.tx.is_closed();
      }
      let snapshot =
        node(root, &watcher.path).cloned().unwrap_or(Value::Null);
      watcher.tx.send(snapshot).is_ok()
    });
  }
}

// ─── Tree navigation ─────────────────────────────────────────────────────────

fn node<'a>(root: &'a Value, path: &StorePath) -> Option<&'a Value> {
  let mut current = root;
  for segment in path.segments() {
    current = current.as_object()?.get(segment)?;
  }
  Some(current)
}

/// Walk to `path`, coercing intermediate nodes into objects as needed.
fn node_mut<'a>(root: &'a mut Value, path: &StorePath) -> &'a mut Value {
  let mut current = root;
  for segment in path.segments() {
    if !current.is_object() {
      *current = Value::Object(Map::new());
    }
    current = match current {
      Value::Object(map) => map.entry(segment.clone()).or_insert(Value::Null),
      _ => unreachable!("coerced to object above"),
    };
  }
  current
}

// ─── Trait impl ──────────────────────────────────────────────────────────────

impl RealtimeStore for MemoryStore {
  async fn get(&self, path: &StorePath) -> Result<Option<Snapshot>> {
    let inner = self.lock();
    Ok(node(&inner.root, path).filter(|v| !v.is_null()).cloned())
  }

  async fn set(&self, path: &StorePath, value: Value) -> Result<()> {
    let mut inner = self.lock();
    inner.check_writable(path)?;
    *node_mut(&mut inner.root, path) = value;
    inner.notify(path);
    Ok(())
  }

  async fn update(
    &self,
    path: &StorePath,
    fields: Map<String, Value>,
  ) -> Result<()> {
    let mut inner = self.lock();
    inner.check_writable(path)?;
    let target = node_mut(&mut inner.root, path);
    if !target.is_object() {
      *target = Value::Object(Map::new());
    }
    if let Value::Object(map) = target {
      for (key, value) in fields {
        map.insert(key, value);
      }
    }
    inner.notify(path);
    Ok(())
  }

  async fn remove(&self, path: &StorePath) -> Result<()> {
    let mut inner = self.lock();
    inner.check_writable(path)?;

    let Some((last, ancestors)) = path.segments().split_last() else {
      return Ok(());
    };
    let mut current = &mut inner.root;
    for segment in ancestors {
      match current.get_mut(segment) {
        Some(next) => current = next,
        // Nothing at the path; deleting a missing value is not an error.
        None => return Ok(()),
      }
    }
    if let Some(map) = current.as_object_mut() {
      map.remove(last);
    }
    inner.notify(path);
    Ok(())
  }

  async fn push(&self, path: &StorePath, value: Value) -> Result<String> {
    let key = Uuid::new_v4().to_string();
    let child = path.clone().child(key.clone());
    self.set(&child, value).await?;
    Ok(key)
  }

  async fn subscribe(&self, path: &StorePath) -> Result<Subscription> {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut inner = self.lock();
    // Initial snapshot at attach time, like the remote store's observer.
    let snapshot = node(&inner.root, path).cloned().unwrap_or(Value::Null);
    let _ = tx.send(snapshot);
    inner.watchers.push(Watcher { path: path.clone(), tx });
    tracing::debug!(path = %path, "subscription attached");
    Ok(Subscription::new(rx))
  }
}
