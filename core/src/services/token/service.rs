//! Main token service implementation

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, info, warn};

use crate::domain::entities::token::{
    AccessTokenStatus, Claims, ClientId, RawRefreshSecret, RefreshCredentialRecord, TokenPair,
};
use crate::errors::{DomainError, DomainResult, StoreError, TokenError};
use crate::repositories::TokenRepository;

use super::config::TokenServiceConfig;
use super::secrets;

/// Service issuing access tokens and rotating refresh secrets
pub struct TokenService<R: TokenRepository> {
    pub(crate) repository: R,
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl<R: TokenRepository> TokenService<R> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `repository` - Credential store for refresh records
    /// * `config` - Token service configuration
    ///
    /// # Returns
    ///
    /// A new `TokenService` instance or error if the signing key is empty
    pub fn new(repository: R, config: TokenServiceConfig) -> Result<Self, DomainError> {
        if config.signing_key.is_empty() {
            return Err(DomainError::Internal {
                message: "Signing key must not be empty".to_string(),
            });
        }

        let encoding_key = EncodingKey::from_secret(config.signing_key.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.signing_key.as_bytes());

        // Expiry is checked by hand so that an expired token still yields its subject
        let mut validation = Validation::new(config.algorithm);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            repository,
            config,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Signs an access token for `client_id` expiring `ttl` from now
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Compact JWT with payload `{sub, exp}`
    /// * `Err(TokenError::SigningFailed)` - Signing failed
    pub fn issue_access_token(&self, client_id: &ClientId, ttl: Duration) -> DomainResult<String> {
        let claims = Claims::new(client_id, ttl).ok_or_else(lifetime_out_of_range)?;
        self.encode_jwt(&claims)
    }

    /// Encodes claims into a JWT
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> DomainResult<String> {
        let header = Header::new(self.config.algorithm);
        encode(&header, claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::SigningFailed))
    }

    /// Generates a new raw refresh secret
    pub fn issue_refresh_secret(&self) -> DomainResult<RawRefreshSecret> {
        Ok(secrets::generate_refresh_secret()?)
    }

    /// Hashes a refresh secret on the blocking pool
    pub async fn hash_secret(&self, secret: &RawRefreshSecret) -> DomainResult<String> {
        let secret = secret.clone();
        let cost = self.config.hash_cost;

        let hash = tokio::task::spawn_blocking(move || secrets::hash_refresh_secret(&secret, cost))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Hashing task failed: {}", e),
            })??;
        Ok(hash)
    }

    /// Checks a refresh secret against a stored hash on the blocking pool
    ///
    /// A malformed hash or a failed task both count as a mismatch.
    pub async fn verify_secret(&self, secret: &RawRefreshSecret, hash: &str) -> bool {
        let secret = secret.clone();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || secrets::verify_refresh_secret(&secret, &hash))
            .await
            .unwrap_or(false)
    }

    /// Verifies an access token without consulting the store
    ///
    /// # Arguments
    ///
    /// * `token` - The JWT access token to verify
    ///
    /// # Returns
    ///
    /// `Valid` or `Expired` with the subject when the signature checks out,
    /// `Invalid` otherwise
    pub fn verify_access_token(&self, token: &str) -> AccessTokenStatus {
        self.verify_access_token_at(token, Utc::now())
    }

    pub(crate) fn verify_access_token_at(&self, token: &str, now: DateTime<Utc>) -> AccessTokenStatus {
        let token_data = match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data,
            Err(e) => {
                if matches!(e.kind(), ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm) {
                    debug!(kind = ?e.kind(), "Access token signature rejected");
                }
                return AccessTokenStatus::Invalid;
            }
        };

        let claims = token_data.claims;
        let Some(expires_at) = claims.expires_at() else {
            return AccessTokenStatus::Invalid;
        };
        let client_id = claims.client_id();

        if claims.is_expired_at(now) {
            AccessTokenStatus::Expired {
                client_id,
                expires_at,
            }
        } else {
            AccessTokenStatus::Valid {
                client_id,
                expires_at,
            }
        }
    }

    /// Resolves the subject of a live access token
    ///
    /// # Returns
    ///
    /// * `Ok(ClientId)` - Token is valid
    /// * `Err(TokenError::AccessTokenExpired)` - Signature valid but expired
    /// * `Err(TokenError::InvalidAccessToken)` - Anything else
    pub fn authenticate(&self, token: &str) -> DomainResult<ClientId> {
        match self.verify_access_token(token) {
            AccessTokenStatus::Valid { client_id, .. } => Ok(client_id),
            AccessTokenStatus::Expired { .. } => Err(TokenError::AccessTokenExpired.into()),
            AccessTokenStatus::Invalid => Err(TokenError::InvalidAccessToken.into()),
        }
    }

    /// Registers a client and returns its first token pair
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - The raw refresh secret is only ever visible here
    /// * `Err(StoreError::DuplicateIdentifier)` - The client already has a record
    pub async fn login(&self, client_id: &ClientId) -> DomainResult<TokenPair> {
        let access_token = self.issue_access_token(client_id, self.config.access_token_ttl)?;
        let refresh_secret = self.issue_refresh_secret()?;
        let refresh_hash = self.hash_secret(&refresh_secret).await?;

        let record =
            RefreshCredentialRecord::new(client_id.clone(), refresh_hash, self.config.refresh_token_ttl)
                .ok_or_else(lifetime_out_of_range)?;

        if let Err(e) = self.repository.create_if_absent(record).await {
            if e == StoreError::DuplicateIdentifier {
                warn!(client_id = %client_id, "Login refused, identifier already registered");
            }
            return Err(e.into());
        }

        info!(client_id = %client_id, "Issued tokens");

        Ok(self.token_pair(access_token, refresh_secret))
    }

    /// Exchanges a refresh secret for a new token pair
    ///
    /// The access token identifies the client. The refresh secret must match
    /// the stored hash, and the stored record is replaced only if nobody else
    /// rotated it in the meantime, so each secret is good for one rotation.
    ///
    /// # Arguments
    ///
    /// * `access_token` - Last access token issued to the client, possibly expired
    /// * `refresh_secret` - Raw refresh secret issued alongside it
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - New pair; the presented secret is now dead
    /// * `Err(TokenError)` - Invalid token, unknown or expired record, or mismatch
    pub async fn rotate(
        &self,
        access_token: &str,
        refresh_secret: &RawRefreshSecret,
    ) -> DomainResult<TokenPair> {
        let client_id = match self.verify_access_token(access_token) {
            AccessTokenStatus::Valid { client_id, .. } => client_id,
            AccessTokenStatus::Expired { client_id, .. } => {
                if self.config.reject_expired_access_on_rotation {
                    return Err(TokenError::AccessTokenExpired.into());
                }
                client_id
            }
            AccessTokenStatus::Invalid => return Err(TokenError::InvalidAccessToken.into()),
        };

        let record = match self.repository.lookup(&client_id).await? {
            Some(record) if !record.is_expired() => record,
            _ => {
                warn!(client_id = %client_id, "Rotation refused, no live refresh record");
                return Err(TokenError::UnknownOrExpiredRefreshToken.into());
            }
        };

        if !self.verify_secret(refresh_secret, &record.refresh_hash).await {
            warn!(client_id = %client_id, "Rotation refused, refresh token mismatch");
            return Err(TokenError::RefreshTokenMismatch.into());
        }

        let new_access_token = self.issue_access_token(&client_id, self.config.access_token_ttl)?;
        let new_secret = self.issue_refresh_secret()?;
        let new_hash = self.hash_secret(&new_secret).await?;
        let expires_at = Utc::now()
            .checked_add_signed(self.config.refresh_token_ttl)
            .ok_or_else(lifetime_out_of_range)?;

        let swapped = match self
            .repository
            .compare_and_overwrite(&client_id, &record.refresh_hash, &new_hash, expires_at)
            .await
        {
            Ok(swapped) => swapped,
            // Record vanished between lookup and write
            Err(StoreError::NotFound) => return Err(TokenError::UnknownOrExpiredRefreshToken.into()),
            Err(e) => return Err(e.into()),
        };

        if !swapped {
            warn!(client_id = %client_id, "Rotation lost to a concurrent rotation");
            return Err(TokenError::RefreshTokenMismatch.into());
        }

        info!(client_id = %client_id, "Refreshed tokens");

        Ok(self.token_pair(new_access_token, new_secret))
    }

    /// Checks that the credential store is reachable
    pub async fn store_ready(&self) -> DomainResult<()> {
        Ok(self.repository.ping().await?)
    }

    fn token_pair(&self, access_token: String, refresh_secret: RawRefreshSecret) -> TokenPair {
        TokenPair::new(
            access_token,
            refresh_secret,
            self.config.access_token_ttl,
            self.config.refresh_token_ttl,
        )
    }
}

fn lifetime_out_of_range() -> DomainError {
    DomainError::Internal {
        message: "Credential lifetime out of range".to_string(),
    }
}
