//! Synchronization layers — one per entity family.
//!
//! Each layer is a thin, explicit object over the store and session traits
//! from `crm-core`: it opens subscriptions that decode snapshots into typed
//! collections, and exposes mutation operations that write through to the
//! store. Local state is confirmed only by the subscription echo, never by
//! optimistic insertion — writes from any client fan out to all subscribers
//! through the same path.
//!
//! Nothing here is a global: construct a layer with the `Arc`-shared
//! collaborators it should talk to, and drop it (and its feeds) to release
//! every listener it holds.

pub mod calendar;
pub mod news;
pub mod session_state;
pub mod tasks;
pub mod users;
