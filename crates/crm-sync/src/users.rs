//! User-directory synchronization layer.
//!
//! Creating and deleting a user each span two systems — the session
//! provider's identity and the `users/{uid}` profile document — so both are
//! explicit two-phase operations: on a step-2 failure the layer attempts a
//! compensating rollback of step 1, and surfaces
//! [`Error::PartiallyCompleted`] when the rollback itself fails, rather
//! than silently leaving an orphaned identity.

use std::sync::Arc;

use serde_json::{Map, Value};

use crm_core::{
  Error, Result, codec,
  session::SessionProvider,
  store::{RealtimeStore, StorePath},
  user::{Role, User},
};

pub struct UserDirectory<S, P> {
  store:    Arc<S>,
  sessions: Arc<P>,
  root:     StorePath,
}

impl<S: RealtimeStore, P: SessionProvider> UserDirectory<S, P> {
  pub fn new(store: Arc<S>, sessions: Arc<P>) -> Self {
    Self { store, sessions, root: StorePath::new("users") }
  }

  /// One-shot read of a single profile document. A missing or malformed
  /// document is an error here — there is no sibling set to fall back to,
  /// and the caller is expected to force sign-out rather than continue in
  /// an authenticated-but-profile-less state.
  pub async fn fetch_by_id(&self, uid: &str) -> Result<User> {
    let path = self.root.clone().child(uid);
    let snapshot = self
      .store
      .get(&path)
      .await?
      .ok_or_else(|| Error::ProfileUnavailable(uid.to_owned()))?;
    codec::decode_user(uid, &snapshot)
  }

  /// One-shot read of the whole directory; the usual drop-on-malformed
  /// collection policy applies.
  pub async fn fetch_all(&self) -> Result<Vec<User>> {
    let snapshot = self.store.get(&self.root).await?;
    Ok(match &snapshot {
      Some(value) => codec::decode_users(value).items,
      None => Vec::new(),
    })
  }

  /// Provision a session identity, then write the profile document keyed by
  /// the new uid.
  pub async fn create(
    &self,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
  ) -> Result<User> {
    let identity = self.sessions.sign_up(email, password).await?;
    let user = User {
      id: identity.uid,
      name: name.to_owned(),
      email: email.to_owned(),
      role,
    };

    let value = codec::encode_user(&user)?;
    let path = self.root.clone().child(user.id.clone());
    if let Err(write_err) = self.store.set(&path, value).await {
      tracing::warn!(
        uid = %user.id,
        error = %write_err,
        "profile write failed; rolling back the provisioned identity"
      );
      return match self.sessions.delete_identity(&user.id).await {
        Ok(()) => Err(write_err),
        Err(rollback_err) => Err(Error::PartiallyCompleted {
          orphaned_uid: user.id,
          detail:       format!(
            "profile write failed ({write_err}); rollback failed \
             ({rollback_err})"
          ),
        }),
      };
    }
    Ok(user)
  }

  /// Field-level role update. Concurrent updates resolve last-write-wins at
  /// the store; both writers see success and no conflict is surfaced.
  pub async fn set_role(&self, uid: &str, role: Role) -> Result<()> {
    let mut fields = Map::new();
    fields.insert("role".into(), Value::String(role.as_str().into()));
    self.store.update(&self.root.clone().child(uid), fields).await
  }

  /// Delete the profile document, then the session identity. If the
  /// identity delete fails after the profile is already gone, the orphan is
  /// surfaced as [`Error::PartiallyCompleted`] — the profile cannot be
  /// restored from here.
  pub async fn delete(&self, uid: &str) -> Result<()> {
    self.store.remove(&self.root.clone().child(uid)).await?;
    self.sessions.delete_identity(uid).await.map_err(|err| {
      tracing::warn!(uid, error = %err, "identity delete failed after profile delete");
      Error::PartiallyCompleted {
        orphaned_uid: uid.to_owned(),
        detail:       format!(
          "profile deleted but identity delete failed ({err})"
        ),
      }
    })
  }
}
