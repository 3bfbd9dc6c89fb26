//! News-feed synchronization layer.
//!
//! Unlike the tasks layer this one has no push echo: reads are one-shot and
//! a successful create triggers a full re-fetch.

use std::sync::Arc;

use chrono::Utc;

use crm_core::{
  Error, Result, codec,
  post::Post,
  session::SessionProvider,
  store::{RealtimeStore, StorePath},
};

pub struct NewsSync<S, P> {
  store:    Arc<S>,
  sessions: Arc<P>,
  root:     StorePath,
}

impl<S: RealtimeStore, P: SessionProvider> NewsSync<S, P> {
  pub fn new(store: Arc<S>, sessions: Arc<P>) -> Self {
    Self { store, sessions, root: StorePath::new("posts") }
  }

  /// One-shot read of all posts, newest first. The client-side sort is
  /// authoritative for display regardless of any server-side ordering.
  pub async fn fetch_once(&self) -> Result<Vec<Post>> {
    let snapshot = self.store.get(&self.root).await?;
    let mut posts = match &snapshot {
      Some(value) => codec::decode_posts(value).items,
      None => Vec::new(),
    };
    posts.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(posts)
  }

  /// Publish a post authored by the current session: `author_name` is the
  /// email local part, `author_id` the session uid. Fails with
  /// [`Error::NotAuthenticated`] before any write is attempted. Returns the
  /// re-fetched collection on success.
  pub async fn create(&self, text: &str) -> Result<Vec<Post>> {
    let session = self.sessions.current().ok_or(Error::NotAuthenticated)?;
    let post = Post {
      id:          None,
      author_name: session.display_name().to_owned(),
      text:        text.to_owned(),
      date:        Utc::now(),
      author_id:   session.uid,
    };
    let value = codec::encode_post(&post)?;
    self.store.push(&self.root, value).await?;
    self.fetch_once().await
  }

  /// Delete by id. Whether the caller is the author or an admin is a UI
  /// gate; no authorization is enforced here.
  pub async fn delete(&self, post: &Post) -> Result<()> {
    let id = post.id.as_deref().ok_or(Error::MissingId("post"))?;
    self.store.remove(&self.root.clone().child(id)).await
  }
}
