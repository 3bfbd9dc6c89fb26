//! Tasks synchronization layer.

use std::sync::Arc;

use serde_json::{Map, Value};

use crm_core::{
  Error, Result, codec,
  store::{RealtimeStore, StorePath, Subscription},
  task::{Task, TaskStatus},
};

/// Synchronizes the `tasks` collection.
///
/// Writes go straight to the store; the local collection is updated only by
/// the subscription echo. The display projection over the published
/// collection lives in [`crm_core::projection`].
pub struct TaskSync<S> {
  store: Arc<S>,
  root:  StorePath,
}

impl<S: RealtimeStore> TaskSync<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self { store, root: StorePath::new("tasks") }
  }

  /// Continuous feed of the full task collection. Every remote change by
  /// any client re-delivers the whole decoded collection; malformed members
  /// are dropped per item, never fatal to the feed.
  pub async fn subscribe(&self) -> Result<TaskFeed> {
    let sub = self.store.subscribe(&self.root).await?;
    Ok(TaskFeed { sub })
  }

  /// Encode the task (excluding its id) and write it under a fresh key.
  /// Returns the allocated key; the new task reaches local state via the
  /// subscription echo only.
  pub async fn create(&self, task: &Task) -> Result<String> {
    let value = codec::encode_task(task)?;
    self.store.push(&self.root, value).await
  }

  /// Write only the `status` field of a persisted task.
  pub async fn set_status(
    &self,
    task: &Task,
    status: TaskStatus,
  ) -> Result<()> {
    let id = task.id.as_deref().ok_or(Error::MissingId("task"))?;
    let mut fields = Map::new();
    fields.insert("status".into(), Value::String(status.as_str().into()));
    self.store.update(&self.root.clone().child(id), fields).await
  }

  /// Flip active ⇄ completed, as the task list's checkmark does. Archived
  /// tasks flip back to active; nothing transitions *to* archived.
  pub async fn toggle_status(&self, task: &Task) -> Result<()> {
    let next = match task.status {
      TaskStatus::Active => TaskStatus::Completed,
      TaskStatus::Completed | TaskStatus::Archived => TaskStatus::Active,
    };
    self.set_status(task, next).await
  }

  pub async fn delete(&self, task: &Task) -> Result<()> {
    let id = task.id.as_deref().ok_or(Error::MissingId("task"))?;
    self.store.remove(&self.root.clone().child(id)).await
  }
}

/// Decoded view over a task-collection subscription. Dropping the feed
/// detaches the underlying listener.
pub struct TaskFeed {
  sub: Subscription,
}

impl TaskFeed {
  /// The next full collection, or `None` when the store has gone away.
  pub async fn next(&mut self) -> Option<Vec<Task>> {
    let snapshot = self.sub.next().await?;
    Some(codec::decode_tasks(&snapshot).items)
  }
}
