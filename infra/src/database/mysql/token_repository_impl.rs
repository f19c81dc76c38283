//! MySQL implementation of the TokenRepository trait.
//!
//! Refresh credential records live in `refresh_credentials`, keyed by client
//! identifier. Uniqueness comes from the primary key and rotation uses a
//! conditional `UPDATE`, so both stay atomic without explicit transactions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

use kt_core::domain::entities::token::{ClientId, RefreshCredentialRecord};
use kt_core::errors::StoreError;
use kt_core::repositories::TokenRepository;

/// MySQL implementation of TokenRepository
#[derive(Clone)]
pub struct MySqlTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    /// Create a new MySQL token repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to a credential record
    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<RefreshCredentialRecord, StoreError> {
        Ok(RefreshCredentialRecord {
            client_id: ClientId::new(binary_text(row, "client_id")?),
            refresh_hash: binary_text(row, "refresh_hash")?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| unavailable("Failed to get expires_at", e))?,
        })
    }

    async fn exists(&self, client_id: &ClientId) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT 1 FROM refresh_credentials WHERE client_id = ?")
            .bind(client_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| unavailable("Failed to check record existence", e))?;
        Ok(row.is_some())
    }
}

/// Key columns are VARBINARY; their bytes are the UTF-8 the service wrote
fn binary_text(row: &sqlx::mysql::MySqlRow, column: &str) -> Result<String, StoreError> {
    let bytes: Vec<u8> = row
        .try_get(column)
        .map_err(|e| unavailable(&format!("Failed to get {}", column), e))?;

    String::from_utf8(bytes).map_err(|_| {
        tracing::error!(column, "Stored value is not valid UTF-8");
        StoreError::unavailable(format!("Stored {} is not valid UTF-8", column))
    })
}

fn unavailable(context: &str, error: sqlx::Error) -> StoreError {
    tracing::error!("{}: {}", context, error);
    StoreError::unavailable(format!("{}: {}", context, error))
}

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn create_if_absent(&self, record: RefreshCredentialRecord) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO refresh_credentials (client_id, refresh_hash, expires_at)
            VALUES (?, ?, ?)
        "#;

        let result = sqlx::query(query)
            .bind(record.client_id.as_str())
            .bind(&record.refresh_hash)
            .bind(record.expires_at)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => {
                tracing::debug!(client_id = %record.client_id, "Inserted refresh credential record");
                Ok(())
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::DuplicateIdentifier)
            }
            Err(e) => Err(unavailable("Failed to insert refresh credential record", e)),
        }
    }

    async fn overwrite(
        &self,
        client_id: &ClientId,
        refresh_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let query = r#"
            UPDATE refresh_credentials
            SET refresh_hash = ?, expires_at = ?
            WHERE client_id = ?
        "#;

        let result = sqlx::query(query)
            .bind(refresh_hash)
            .bind(expires_at)
            .bind(client_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| unavailable("Failed to overwrite refresh credential record", e))?;

        // Zero means no row matched, or an unchanged row if the server
        // counts changed rows instead of found rows
        if result.rows_affected() == 0 && !self.exists(client_id).await? {
            return Err(StoreError::NotFound);
        }

        tracing::debug!(client_id = %client_id, "Overwrote refresh credential record");
        Ok(())
    }

    async fn compare_and_overwrite(
        &self,
        client_id: &ClientId,
        expected_hash: &str,
        new_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let query = r#"
            UPDATE refresh_credentials
            SET refresh_hash = ?, expires_at = ?
            WHERE client_id = ? AND refresh_hash = ?
        "#;

        let result = sqlx::query(query)
            .bind(new_hash)
            .bind(expires_at)
            .bind(client_id.as_str())
            .bind(expected_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| unavailable("Failed to rotate refresh credential record", e))?;

        if result.rows_affected() > 0 {
            tracing::debug!(client_id = %client_id, "Rotated refresh credential record");
            return Ok(true);
        }

        if self.exists(client_id).await? {
            Ok(false)
        } else {
            Err(StoreError::NotFound)
        }
    }

    async fn lookup(&self, client_id: &ClientId) -> Result<Option<RefreshCredentialRecord>, StoreError> {
        let query = r#"
            SELECT client_id, refresh_hash, expires_at
            FROM refresh_credentials
            WHERE client_id = ?
        "#;

        let row = sqlx::query(query)
            .bind(client_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| unavailable("Failed to look up refresh credential record", e))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| unavailable("Credential store ping failed", e))?;
        Ok(())
    }
}
