//! Credential store trait for refresh credential persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::domain::entities::token::{ClientId, RefreshCredentialRecord};
use crate::errors::StoreError;

/// Repository trait for refresh credential records, keyed by client identifier
///
/// Every method is a single atomic operation against the backing store.
/// Implementations hold only hashes; raw refresh secrets never reach them.
///
/// # Concurrency
/// `compare_and_overwrite` is the only write that rotation uses. It must
/// replace the record only while the stored hash still equals the hash the
/// caller verified, so that two rotations racing on the same secret cannot
/// both succeed.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Insert a record if no record exists for its client
    ///
    /// # Arguments
    /// * `record` - Record to insert
    ///
    /// # Returns
    /// * `Ok(())` - Record inserted
    /// * `Err(StoreError::DuplicateIdentifier)` - A record already exists
    /// * `Err(StoreError::Unavailable)` - Backend failure
    ///
    /// # Example
    /// ```no_run
    /// # use chrono::Duration;
    /// # use kt_core::repositories::TokenRepository;
    /// # use kt_core::domain::entities::token::{ClientId, RefreshCredentialRecord};
    /// # async fn example(repo: &impl TokenRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// let record = RefreshCredentialRecord::new(
    ///     ClientId::new("device-1"),
    ///     "$2b$12$...".to_string(),
    ///     Duration::days(31),
    /// )
    /// .ok_or("lifetime out of range")?;
    ///
    /// repo.create_if_absent(record).await?;
    /// # Ok(())
    /// # }
    /// ```
    async fn create_if_absent(&self, record: RefreshCredentialRecord) -> Result<(), StoreError>;

    /// Replace hash and expiry of an existing record unconditionally
    ///
    /// # Returns
    /// * `Err(StoreError::NotFound)` - No record exists for `client_id`
    async fn overwrite(
        &self,
        client_id: &ClientId,
        refresh_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Replace hash and expiry only if the stored hash equals `expected_hash`
    ///
    /// # Returns
    /// * `Ok(true)` - Record replaced
    /// * `Ok(false)` - Stored hash changed since it was read
    /// * `Err(StoreError::NotFound)` - No record exists for `client_id`
    async fn compare_and_overwrite(
        &self,
        client_id: &ClientId,
        expected_hash: &str,
        new_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    /// Fetch the record for a client
    ///
    /// # Example
    /// ```no_run
    /// # use kt_core::repositories::TokenRepository;
    /// # use kt_core::domain::entities::token::ClientId;
    /// # async fn example(repo: &impl TokenRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// match repo.lookup(&ClientId::new("device-1")).await? {
    ///     Some(record) if !record.is_expired() => println!("active until {}", record.expires_at),
    ///     Some(_) => println!("expired"),
    ///     None => println!("never logged in"),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    async fn lookup(&self, client_id: &ClientId) -> Result<Option<RefreshCredentialRecord>, StoreError>;

    /// Check that the backend is reachable
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl<T: TokenRepository + ?Sized> TokenRepository for Arc<T> {
    async fn create_if_absent(&self, record: RefreshCredentialRecord) -> Result<(), StoreError> {
        (**self).create_if_absent(record).await
    }

    async fn overwrite(
        &self,
        client_id: &ClientId,
        refresh_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        (**self).overwrite(client_id, refresh_hash, expires_at).await
    }

    async fn compare_and_overwrite(
        &self,
        client_id: &ClientId,
        expected_hash: &str,
        new_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        (**self)
            .compare_and_overwrite(client_id, expected_hash, new_hash, expires_at)
            .await
    }

    async fn lookup(&self, client_id: &ClientId) -> Result<Option<RefreshCredentialRecord>, StoreError> {
        (**self).lookup(client_id).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        (**self).ping().await
    }
}
