//! Creator Directory: identity resolution and creator profiles.
//!
//! Resolution is keyed by the identity provider's subject claim so that a
//! creator keeps their account across email changes. An email already claimed
//! under a different subject is still refused rather than silently merged.

use crate::{
  Error, Result,
  creator::{Creator, CreatorPatch, CreatorSnapshot, derive_username, fallback_username},
  id::CreatorId,
  identity::{IdentityProvider, VerifiedIdentity},
  store::{CatalogStore, CreatorConflict, CreatorQuery},
  validate,
};

/// Inserts tried by [`CreatorDirectory::resolve_or_create`] before giving up
/// on key collisions.
const INSERT_ATTEMPTS: usize = 4;

pub struct CreatorDirectory<'a, S> {
  store: &'a S,
}

impl<'a, S: CatalogStore> CreatorDirectory<'a, S> {
  pub fn new(store: &'a S) -> Self { Self { store } }

  async fn find(&self, query: CreatorQuery) -> Result<Option<Creator>> {
    self.store.find_creator(query).await.map_err(Error::store)
  }

  /// Return the creator owning `identity.subject`, creating one on first
  /// sight.
  ///
  /// Fails with [`Error::DuplicateIdentity`] when the subject is new but its
  /// email already belongs to another creator.
  pub async fn resolve_or_create(&self, identity: VerifiedIdentity) -> Result<Creator> {
    if let Some(existing) = self.find(CreatorQuery::Subject(identity.subject.clone())).await? {
      return Ok(existing);
    }

    if !identity.email.is_empty()
      && self.find(CreatorQuery::Email(identity.email.clone())).await?.is_some()
    {
      return Err(Error::DuplicateIdentity { email: identity.email });
    }

    let username = self.pick_username(&identity.name).await?;
    let mut creator = Creator::from_identity(identity, username);

    // The lookups above can race with a concurrent sign-in; the store's
    // unique keys decide.
    for _ in 0..INSERT_ATTEMPTS {
      let conflict = match self.store.insert_creator(creator.clone()).await {
        Ok(Ok(created)) => return Ok(created),
        Ok(Err(conflict)) => conflict,
        Err(e) => return Err(Error::store(e)),
      };
      match conflict {
        CreatorConflict::Subject => {
          let subject = CreatorQuery::Subject(creator.identity.subject.clone());
          if let Some(existing) = self.find(subject).await? {
            return Ok(existing);
          }
        }
        CreatorConflict::Email => {
          return Err(Error::DuplicateIdentity { email: creator.identity.email });
        }
        CreatorConflict::Username => creator.username = fallback_username(),
        CreatorConflict::Id => creator.id = CreatorId::generate(),
      }
    }

    Err(Error::StoreUnavailable(
      format!("creator insert kept colliding after {INSERT_ATTEMPTS} attempts").into(),
    ))
  }

  /// Look up the creator owning `identity.subject` without creating one.
  pub async fn login(&self, identity: &VerifiedIdentity) -> Result<Creator> {
    self
      .find(CreatorQuery::Subject(identity.subject.clone()))
      .await?
      .ok_or_else(|| Error::NotFound { entity: "creator", id: identity.subject.clone() })
  }

  /// Verify `credential` with `provider`, then [`resolve_or_create`](Self::resolve_or_create).
  pub async fn sign_in<P: IdentityProvider>(
    &self,
    provider: &P,
    credential: String,
  ) -> Result<Creator> {
    let identity = verify(provider, credential).await?;
    self.resolve_or_create(identity).await
  }

  /// Verify `credential` with `provider`, then [`login`](Self::login).
  pub async fn log_in<P: IdentityProvider>(
    &self,
    provider: &P,
    credential: String,
  ) -> Result<Creator> {
    let identity = verify(provider, credential).await?;
    self.login(&identity).await
  }

  pub async fn find_by_external_id(&self, id: &CreatorId) -> Result<Creator> {
    self
      .find(CreatorQuery::Id(id.clone()))
      .await?
      .ok_or_else(|| Error::NotFound { entity: "creator", id: id.to_string() })
  }

  /// Merge the supplied profile fields. The creator's id never changes.
  pub async fn update(&self, id: &CreatorId, patch: CreatorPatch) -> Result<Creator> {
    validate::creator_patch(&patch)?;

    if let Some(username) = &patch.username
      && let Some(owner) = self.find(CreatorQuery::Username(username.clone())).await?
      && owner.id != *id
    {
      return Err(Error::invalid(format!("username {username:?} is already taken")));
    }

    self
      .store
      .update_creator(id.clone(), patch)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::NotFound { entity: "creator", id: id.to_string() })
  }

  /// Freeze the creator's embeddable fields as of now.
  pub async fn snapshot(&self, id: &CreatorId) -> Result<CreatorSnapshot> {
    Ok(self.find_by_external_id(id).await?.snapshot())
  }

  async fn pick_username(&self, display_name: &str) -> Result<String> {
    if let Some(derived) = derive_username(display_name)
      && self.find(CreatorQuery::Username(derived.clone())).await?.is_none()
    {
      return Ok(derived);
    }
    Ok(fallback_username())
  }
}

async fn verify<P: IdentityProvider>(
  provider: &P,
  credential: String,
) -> Result<VerifiedIdentity> {
  provider
    .verify(credential)
    .await
    .map_err(|e| Error::VerificationFailed(Box::new(e)))
}
