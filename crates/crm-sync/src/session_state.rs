//! The session-derived current-profile cache.
//!
//! The one genuine state machine in the system: identity changes from the
//! session provider drive a profile fetch, and the fetched profile gates
//! every downstream screen. A session whose profile cannot be fetched is
//! forcibly signed out — an authenticated-but-profile-less state is never
//! published as final.

use std::sync::Arc;

use tokio::{sync::watch, task::JoinHandle};

use crm_core::{
  session::{Session, SessionProvider},
  store::RealtimeStore,
  user::User,
};

use crate::users::UserDirectory;

/// Current position in the session/profile lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProfileState {
  /// No authenticated session.
  #[default]
  NoSession,
  /// A session exists and its profile fetch is in flight.
  SessionNoProfile,
  /// A session with its decoded profile document.
  SessionWithProfile(User),
}

impl ProfileState {
  pub fn profile(&self) -> Option<&User> {
    match self {
      Self::SessionWithProfile(user) => Some(user),
      _ => None,
    }
  }
}

/// Drives the profile cache from the provider's identity watch.
///
/// Owns a background task; dropping the tracker (or calling
/// [`shutdown`](Self::shutdown)) stops it and releases the identity watch.
pub struct SessionTracker {
  rx:     watch::Receiver<ProfileState>,
  driver: JoinHandle<()>,
}

impl SessionTracker {
  pub fn spawn<S, P>(store: Arc<S>, sessions: Arc<P>) -> Self
  where
    S: RealtimeStore + 'static,
    P: SessionProvider + 'static,
  {
    let (tx, rx) = watch::channel(ProfileState::default());
    let directory = UserDirectory::new(store, Arc::clone(&sessions));
    let mut identities = sessions.watch();

    let driver = tokio::spawn(async move {
      loop {
        let current = identities.current();
        apply(&directory, sessions.as_ref(), current, &tx).await;
        if !identities.changed().await {
          break;
        }
      }
    });

    Self { rx, driver }
  }

  /// Feed of the current state; `borrow` the receiver for the latest value.
  pub fn watch(&self) -> watch::Receiver<ProfileState> { self.rx.clone() }

  pub fn shutdown(&self) { self.driver.abort(); }
}

impl Drop for SessionTracker {
  fn drop(&mut self) { self.driver.abort(); }
}

async fn apply<S, P>(
  directory: &UserDirectory<S, P>,
  sessions: &P,
  session: Option<Session>,
  tx: &watch::Sender<ProfileState>,
) where
  S: RealtimeStore,
  P: SessionProvider,
{
  let Some(session) = session else {
    let _ = tx.send(ProfileState::NoSession);
    return;
  };

  let _ = tx.send(ProfileState::SessionNoProfile);
  match directory.fetch_by_id(&session.uid).await {
    Ok(user) => {
      let _ = tx.send(ProfileState::SessionWithProfile(user));
    }
    Err(err) => {
      tracing::warn!(
        uid = %session.uid,
        error = %err,
        "profile fetch failed; forcing sign-out"
      );
      // The forced sign-out also arrives on the identity watch as a
      // change to no-session; publishing NoSession here keeps the cache
      // consistent even if that echo is delayed.
      let _ = sessions.sign_out().await;
      let _ = tx.send(ProfileState::NoSession);
    }
  }
}
