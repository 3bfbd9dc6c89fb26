//! Error types for `crm-core`.
//!
//! Per-item decode failures inside a collection snapshot are not errors at
//! all — malformed members are dropped (with a diagnostic count) so one
//! corrupted document never hides its siblings. Everything that does fail an
//! operation lands in this taxonomy.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The operation requires an authenticated session and none is active.
  #[error("no active session")]
  NotAuthenticated,

  /// A mutation targeted an entity that has never been persisted, so there
  /// is no store key to address.
  #[error("{0} has no store id yet")]
  MissingId(&'static str),

  /// A local record could not be serialised to the wire format.
  #[error("failed to encode {entity}: {source}")]
  Encoding {
    entity: &'static str,
    #[source]
    source: serde_json::Error,
  },

  /// Opaque read failure reported by the store; the message is passed
  /// through verbatim.
  #[error("store read failed: {0}")]
  Read(String),

  /// Opaque write failure reported by the store; the message is passed
  /// through verbatim.
  #[error("store write failed: {0}")]
  Write(String),

  /// Failure reported by the session provider (bad credentials, unknown
  /// identity, provider outage).
  #[error("session provider error: {0}")]
  Session(String),

  /// A single profile document was absent or malformed. Collections fall
  /// back to dropping the member; a profile read has nothing to fall back
  /// to, so the failure propagates and the caller is expected to force
  /// sign-out.
  #[error("profile document for {0} is missing or malformed")]
  ProfileUnavailable(String),

  /// A two-phase user operation finished its first step, then both the
  /// second step and the compensating rollback failed. The named session
  /// identity is orphaned and needs manual cleanup.
  #[error("session identity {orphaned_uid} left orphaned: {detail}")]
  PartiallyCompleted { orphaned_uid: String, detail: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
