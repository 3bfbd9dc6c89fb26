//! User profile documents from the `users` collection.
//!
//! The profile document is distinct from the session identity at the
//! authentication boundary; the two are linked only by sharing the uid.

use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// Access level recorded on a profile. Mutable only through the directory's
/// role update, which is gated to admin-privileged actors at the UI.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Admin,
  Manager,
  Employee,
}

impl Role {
  /// The wire string stored in the `role` field.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Admin => "admin",
      Self::Manager => "manager",
      Self::Employee => "employee",
    }
  }
}

/// A profile document. `id` equals the session identity's uid and keys the
/// collection; it lives in the document path, not the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  #[serde(skip)]
  pub id:    String,
  pub name:  String,
  pub email: String,
  pub role:  Role,
}
