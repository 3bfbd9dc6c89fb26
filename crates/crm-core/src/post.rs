//! News posts — the `posts` collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codec::epoch_seconds;

/// A news-feed post. `author_name` is a display snapshot taken at creation
/// time, never live-joined against the author's current profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
  #[serde(skip)]
  pub id:          Option<String>,
  pub author_name: String,
  pub text:        String,
  #[serde(with = "epoch_seconds")]
  pub date:        DateTime<Utc>,
  /// The creating session's uid.
  pub author_id:   String,
}
