//! Core types and trait definitions for the CRM sync engine.
//!
//! This crate is deliberately free of any backend dependency. It holds the
//! domain records, the wire codec, the pure display projections, and the two
//! external-collaborator traits ([`store::RealtimeStore`] and
//! [`session::SessionProvider`]) that everything else is written against.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod codec;
pub mod error;
pub mod event;
pub mod post;
pub mod projection;
pub mod session;
pub mod store;
pub mod task;
pub mod user;

pub use error::{Error, Result};

#[cfg(test)]
mod tests;
