//! In-process backend for the CRM sync engine.
//!
//! [`MemoryStore`] reproduces the observable semantics of the remote tree —
//! path-addressed JSON values with full-snapshot fan-out to subscribers on
//! every change — and [`MemorySessions`] does the same for the
//! authentication boundary. Primary use is integration testing and local
//! development; both carry fault-injection hooks so the partial-failure
//! paths of the user sagas can be exercised.

mod sessions;
mod store;

pub use sessions::MemorySessions;
pub use store::MemoryStore;
