//! Credential entities for JWT access tokens and opaque refresh secrets.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Access token expiration time (15 minutes)
pub const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 15;

/// Refresh token expiration time (31 days)
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 31;

/// Number of random bytes behind every refresh secret
pub const REFRESH_SECRET_BYTES: usize = 32;

/// Opaque client identifier supplied at login.
///
/// The value is not validated for format; it is the primary key of the
/// client's refresh credential record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ClientId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ClientId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Claims structure for the access token payload.
///
/// The payload is exactly `{sub, exp}`; nothing else is signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (client identifier)
    pub sub: String,

    /// Expiration timestamp (seconds since the Unix epoch)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for `client_id` expiring `ttl` from now
    ///
    /// `None` if the expiry falls outside the representable date range.
    pub fn new(client_id: &ClientId, ttl: Duration) -> Option<Self> {
        Self::issued_at(client_id, ttl, Utc::now())
    }

    /// Creates claims for `client_id` expiring `ttl` after `now`
    pub fn issued_at(client_id: &ClientId, ttl: Duration, now: DateTime<Utc>) -> Option<Self> {
        let expires_at = now.checked_add_signed(ttl)?;
        Some(Self {
            sub: client_id.as_str().to_string(),
            exp: expires_at.timestamp(),
        })
    }

    /// Expiry as a timestamp, `None` if `exp` is out of range
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }

    /// Checks if the claims have expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Gets the client identifier from the claims
    pub fn client_id(&self) -> ClientId {
        ClientId::new(self.sub.clone())
    }
}

/// Outcome of checking a presented access token.
///
/// Signature and payload shape are checked before expiry, so `Expired`
/// always carries a subject that this process signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessTokenStatus {
    /// Signature verified and not yet expired
    Valid {
        client_id: ClientId,
        expires_at: DateTime<Utc>,
    },
    /// Signature verified but `exp` has passed
    Expired {
        client_id: ClientId,
        expires_at: DateTime<Utc>,
    },
    /// Bad signature, wrong algorithm or malformed payload
    Invalid,
}

/// Raw refresh secret handed to the client exactly once.
///
/// Only its bcrypt hash is ever stored. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct RawRefreshSecret(String);

impl RawRefreshSecret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the secret for hashing or for the response body
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for RawRefreshSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawRefreshSecret([redacted])")
    }
}

/// Refresh credential record held by the credential store.
///
/// One record per client; rotation replaces `refresh_hash` and `expires_at`
/// in place, so earlier generations are not retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshCredentialRecord {
    /// Client this record belongs to (unique key)
    pub client_id: ClientId,

    /// bcrypt hash of the current raw refresh secret
    pub refresh_hash: String,

    /// Timestamp when the refresh secret expires
    pub expires_at: DateTime<Utc>,
}

impl RefreshCredentialRecord {
    /// Creates a record expiring `ttl` from now
    ///
    /// `None` if the expiry falls outside the representable date range.
    pub fn new(client_id: ClientId, refresh_hash: String, ttl: Duration) -> Option<Self> {
        Some(Self {
            client_id,
            refresh_hash,
            expires_at: Utc::now().checked_add_signed(ttl)?,
        })
    }

    /// Checks if the refresh secret has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Checks if the refresh secret has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Signed access token
    pub access_token: String,

    /// Raw refresh secret
    pub refresh_token: RawRefreshSecret,

    /// Access token lifetime in seconds
    pub access_expires_in: i64,

    /// Refresh secret lifetime in seconds
    pub refresh_expires_in: i64,
}

impl TokenPair {
    pub fn new(
        access_token: String,
        refresh_token: RawRefreshSecret,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            access_expires_in: access_ttl.num_seconds(),
            refresh_expires_in: refresh_ttl.num_seconds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_payload() {
        let client_id = ClientId::new("u1");
        let now = Utc::now();
        let claims = Claims::issued_at(&client_id, Duration::minutes(15), now).unwrap();

        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.exp, now.timestamp() + 15 * 60);
        assert_eq!(claims.client_id(), client_id);
        assert!(!claims.is_expired_at(now));

        // Only sub and exp are serialized
        let json = serde_json::to_value(&claims).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn test_claims_expiration() {
        let mut claims = Claims::new(&ClientId::new("u1"), Duration::minutes(15)).unwrap();

        claims.exp = Utc::now().timestamp() - 1;

        assert!(claims.is_expired_at(Utc::now()));
        assert!(claims.expires_at().is_some());
    }

    #[test]
    fn test_raw_secret_debug_is_redacted() {
        let secret = RawRefreshSecret::new("c2VjcmV0LXZhbHVl");
        let rendered = format!("{:?}", secret);

        assert!(!rendered.contains("c2VjcmV0LXZhbHVl"));
        assert_eq!(secret.expose_secret(), "c2VjcmV0LXZhbHVl");

        let pair = TokenPair::new(
            "jwt".to_string(),
            secret,
            Duration::minutes(15),
            Duration::days(31),
        );
        assert!(!format!("{:?}", pair).contains("c2VjcmV0LXZhbHVl"));
    }

    #[test]
    fn test_record_expiration() {
        let mut record = RefreshCredentialRecord::new(
            ClientId::new("u1"),
            "hash".to_string(),
            Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
        )
        .unwrap();

        assert!(!record.is_expired());
        assert!(record.expires_at > Utc::now() + Duration::days(REFRESH_TOKEN_EXPIRY_DAYS - 1));

        record.expires_at = Utc::now() - Duration::seconds(1);

        assert!(record.is_expired());
    }

    #[test]
    fn test_expiry_past_the_calendar_is_refused() {
        let ttl = Duration::days(365 * 1_000_000);

        assert!(Claims::new(&ClientId::new("u1"), ttl).is_none());
        assert!(RefreshCredentialRecord::new(ClientId::new("u1"), "hash".to_string(), ttl).is_none());
    }

    #[test]
    fn test_token_pair_lifetimes() {
        let pair = TokenPair::new(
            "access".to_string(),
            RawRefreshSecret::new("refresh"),
            Duration::minutes(ACCESS_TOKEN_EXPIRY_MINUTES),
            Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
        );

        assert_eq!(pair.access_expires_in, 15 * 60);
        assert_eq!(pair.refresh_expires_in, 31 * 24 * 60 * 60);
    }
}
