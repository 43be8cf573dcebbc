//! User profile services.
//!
//! Implements the profile driving ports over the credential store. Profiles
//! are read through the same store that authentication uses, so a rename is
//! visible to the next login without any cache invalidation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    CredentialStore, CredentialStoreError, UserProfileCommand, UserProfileQuery,
};
use crate::domain::{DisplayName, EmailAddress, Error, UserProfile};

fn map_credential_error(error: CredentialStoreError) -> Error {
    match error {
        CredentialStoreError::Connection { message } => {
            Error::store_unavailable(format!("credential store unavailable: {message}"))
        }
        CredentialStoreError::Query { message } => {
            Error::internal(format!("credential store error: {message}"))
        }
        // Profile operations never insert, so a duplicate here is a bug.
        CredentialStoreError::DuplicateEmail { email } => {
            Error::internal(format!("unexpected duplicate account for {email}"))
        }
    }
}

/// Profile service implementing the query and command driving ports.
#[derive(Clone)]
pub struct UserProfileService<C: ?Sized> {
    credential_store: Arc<C>,
}

impl<C: ?Sized> UserProfileService<C> {
    /// Create the service with the credential store.
    pub fn new(credential_store: Arc<C>) -> Self {
        Self { credential_store }
    }
}

#[async_trait]
impl<C> UserProfileQuery for UserProfileService<C>
where
    C: CredentialStore + ?Sized,
{
    async fn profile(&self, email: &EmailAddress) -> Result<UserProfile, Error> {
        self.credential_store
            .find_by_email(email)
            .await
            .map_err(map_credential_error)?
            .map(Into::into)
            .ok_or_else(|| Error::not_found(format!("no account for {email}")))
    }
}

#[async_trait]
impl<C> UserProfileCommand for UserProfileService<C>
where
    C: CredentialStore + ?Sized,
{
    async fn update_display_name(
        &self,
        email: &EmailAddress,
        display_name: DisplayName,
    ) -> Result<UserProfile, Error> {
        let record = self
            .credential_store
            .update_display_name(email, &display_name)
            .await
            .map_err(map_credential_error)?
            .ok_or_else(|| Error::not_found(format!("no account for {email}")))?;

        info!(user_id = %record.id, "display name updated");
        Ok(record.into())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{ErrorCode, NewUser};
    use crate::outbound::memory::MemoryCredentialStore;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> Arc<MemoryCredentialStore> {
        Arc::new(MemoryCredentialStore::new())
    }

    fn email() -> EmailAddress {
        EmailAddress::new("runner@example.com").expect("valid email")
    }

    async fn seed(store: &MemoryCredentialStore) {
        store
            .create(NewUser {
                email: email(),
                display_name: DisplayName::new("Runner").expect("valid name"),
                password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_owned(),
            })
            .await
            .expect("seeding succeeds");
    }

    #[rstest]
    #[tokio::test]
    async fn profile_reads_the_stored_account(store: Arc<MemoryCredentialStore>) {
        seed(&store).await;
        let service = UserProfileService::new(Arc::clone(&store));

        let profile = service.profile(&email()).await.expect("profile exists");
        assert_eq!(profile.display_name().as_ref(), "Runner");
    }

    #[rstest]
    #[tokio::test]
    async fn missing_accounts_are_not_found(store: Arc<MemoryCredentialStore>) {
        let service = UserProfileService::new(store);

        let err = service
            .profile(&email())
            .await
            .expect_err("lookup must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn renames_are_visible_to_subsequent_reads(store: Arc<MemoryCredentialStore>) {
        seed(&store).await;
        let service = UserProfileService::new(Arc::clone(&store));

        let updated = service
            .update_display_name(&email(), DisplayName::new("Sprinter").expect("valid name"))
            .await
            .expect("rename succeeds");
        assert_eq!(updated.display_name().as_ref(), "Sprinter");

        let profile = service.profile(&email()).await.expect("profile exists");
        assert_eq!(profile.display_name().as_ref(), "Sprinter");
    }
}
