//! The `SessionProvider` trait — the authentication boundary.
//!
//! A session identity is the account record at the provider, distinct from
//! the profile document stored under `users/{uid}`; the two share only the
//! uid. The provider is an external collaborator: this crate defines the
//! seam, `crm-store-memory` carries the in-process implementation.

use std::future::Future;

use tokio::sync::watch;

use crate::Result;

/// The current authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
  pub uid:   String,
  pub email: String,
}

impl Session {
  /// Display handle derived from the email local part (before `@`).
  pub fn display_name(&self) -> &str {
    match self.email.split_once('@') {
      Some((local, _)) => local,
      None => &self.email,
    }
  }
}

/// Identity-change feed.
///
/// Carries the current identity at attach time and a new value on every
/// sign-in and sign-out. Dropping the watch detaches it.
pub struct IdentityWatch {
  rx: watch::Receiver<Option<Session>>,
}

impl IdentityWatch {
  pub fn new(rx: watch::Receiver<Option<Session>>) -> Self { Self { rx } }

  /// The identity as of the most recent change.
  pub fn current(&self) -> Option<Session> { self.rx.borrow().clone() }

  /// Wait for the next identity change. Returns `false` once the provider
  /// has shut down.
  pub async fn changed(&mut self) -> bool { self.rx.changed().await.is_ok() }
}

/// Abstraction over the authentication provider.
pub trait SessionProvider: Send + Sync {
  /// Authenticate and make the returned session current.
  fn sign_in<'a>(
    &'a self,
    email: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<Session>> + Send + 'a;

  /// Provision a new identity. Does **not** change the current session —
  /// provisioning an account (as the admin panel does) is distinct from
  /// signing in as it.
  fn sign_up<'a>(
    &'a self,
    email: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<Session>> + Send + 'a;

  /// Clear the current session. A no-op when none is active.
  fn sign_out(&self) -> impl Future<Output = Result<()>> + Send + '_;

  /// Delete a provisioned identity. Used by the user-directory sagas and
  /// their compensation steps.
  fn delete_identity<'a>(
    &'a self,
    uid: &'a str,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  /// The current session, if any.
  fn current(&self) -> Option<Session>;

  /// Attach an identity-change subscription.
  fn watch(&self) -> IdentityWatch;
}
