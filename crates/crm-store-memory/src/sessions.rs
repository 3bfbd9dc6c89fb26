//! [`MemorySessions`] — the in-memory implementation of [`SessionProvider`].

use std::{
  collections::HashMap,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tokio::sync::watch;
use uuid::Uuid;

use crm_core::{
  Error, Result,
  session::{IdentityWatch, Session, SessionProvider},
};

struct Account {
  uid:      String,
  password: String,
}

#[derive(Default)]
struct Inner {
  /// Keyed by email.
  accounts:              HashMap<String, Account>,
  current:               Option<Session>,
  fail_identity_deletes: bool,
}

/// An in-process session provider: an account registry plus a single current
/// session, with identity-change fan-out.
///
/// Cloning is cheap — clones share the registry and the current session.
#[derive(Clone)]
pub struct MemorySessions {
  inner: Arc<Mutex<Inner>>,
  tx:    Arc<watch::Sender<Option<Session>>>,
}

impl Default for MemorySessions {
  fn default() -> Self { Self::new() }
}

impl MemorySessions {
  pub fn new() -> Self {
    let (tx, _) = watch::channel(None);
    Self { inner: Arc::new(Mutex::new(Inner::default())), tx: Arc::new(tx) }
  }

  /// Make identity deletes fail with a provider error. Test hook for the
  /// user-directory sagas' compensation paths.
  pub fn fail_identity_deletes(&self, fail: bool) {
    self.lock().fail_identity_deletes = fail;
  }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl SessionProvider for MemorySessions {
  async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
    let session = {
      let mut inner = self.lock();
      let account = inner
        .accounts
        .get(email)
        .filter(|account| account.password == password)
        .ok_or_else(|| Error::Session("invalid email or password".into()))?;
      let session =
        Session { uid: account.uid.clone(), email: email.to_owned() };
      inner.current = Some(session.clone());
      session
    };
    let _ = self.tx.send(Some(session.clone()));
    Ok(session)
  }

  async fn sign_up(&self, email: &str, password: &str) -> Result<Session> {
    let mut inner = self.lock();
    if inner.accounts.contains_key(email) {
      return Err(Error::Session(format!("email already registered: {email}")));
    }
    let uid = Uuid::new_v4().to_string();
    inner.accounts.insert(
      email.to_owned(),
      Account { uid: uid.clone(), password: password.to_owned() },
    );
    // The current session is untouched: provisioning is not signing in.
    Ok(Session { uid, email: email.to_owned() })
  }

  async fn sign_out(&self) -> Result<()> {
    self.lock().current = None;
    let _ = self.tx.send(None);
    Ok(())
  }

  async fn delete_identity(&self, uid: &str) -> Result<()> {
    let was_current = {
      let mut inner = self.lock();
      if inner.fail_identity_deletes {
        return Err(Error::Session("injected identity delete failure".into()));
      }
      let email = inner
        .accounts
        .iter()
        .find(|(_, account)| account.uid == uid)
        .map(|(email, _)| email.clone())
        .ok_or_else(|| Error::Session(format!("no such identity: {uid}")))?;
      inner.accounts.remove(&email);

      let was_current =
        inner.current.as_ref().is_some_and(|session| session.uid == uid);
      if was_current {
        inner.current = None;
      }
      was_current
    };
    if was_current {
      let _ = self.tx.send(None);
    }
    Ok(())
  }

  fn current(&self) -> Option<Session> { self.lock().current.clone() }

  fn watch(&self) -> IdentityWatch { IdentityWatch::new(self.tx.subscribe()) }
}
