//! Integration tests for the MySQL credential store
//!
//! Run against a disposable database by setting `TEST_DATABASE_URL`;
//! without it every test returns early.

use chrono::{Duration, DurationRound, Utc};
use rand::Rng;

use kt_core::domain::entities::token::{ClientId, RefreshCredentialRecord};
use kt_core::errors::StoreError;
use kt_core::repositories::TokenRepository;
use kt_infra::database::{DatabasePool, MySqlTokenRepository};
use kt_shared::config::DatabaseConfig;

async fn setup() -> Option<MySqlTokenRepository> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = DatabasePool::new(DatabaseConfig::new(url).with_max_connections(5))
        .await
        .expect("test database reachable");
    pool.ensure_schema().await.expect("schema created");
    pool.ping().await.expect("ping");
    Some(MySqlTokenRepository::new(pool.get_pool().clone()))
}

fn unique_client() -> ClientId {
    let suffix: u64 = rand::thread_rng().gen();
    ClientId::new(format!("it-{:016x}", suffix))
}

fn record(client_id: &ClientId, hash: &str) -> RefreshCredentialRecord {
    let mut record =
        RefreshCredentialRecord::new(client_id.clone(), hash.to_string(), Duration::days(31)).unwrap();
    // DATETIME(6) keeps microseconds
    record.expires_at = record.expires_at.duration_trunc(Duration::microseconds(1)).unwrap();
    record
}

#[tokio::test]
async fn test_create_and_lookup() {
    let Some(repo) = setup().await else { return };
    let client_id = unique_client();

    repo.create_if_absent(record(&client_id, "hash-1")).await.unwrap();

    let found = repo.lookup(&client_id).await.unwrap().unwrap();
    assert_eq!(found.client_id, client_id);
    assert_eq!(found.refresh_hash, "hash-1");
    assert!(!found.is_expired());
}

#[tokio::test]
async fn test_duplicate_identifier() {
    let Some(repo) = setup().await else { return };
    let client_id = unique_client();

    repo.create_if_absent(record(&client_id, "hash-1")).await.unwrap();
    let result = repo.create_if_absent(record(&client_id, "hash-2")).await;

    assert_eq!(result, Err(StoreError::DuplicateIdentifier));
}

#[tokio::test]
async fn test_identifiers_differing_in_case_are_distinct() {
    let Some(repo) = setup().await else { return };
    let suffix: u64 = rand::thread_rng().gen();
    let lower = ClientId::new(format!("it-x-{:016x}", suffix));
    let upper = ClientId::new(lower.as_str().to_uppercase());
    let padded = ClientId::new(format!("{} ", lower));

    repo.create_if_absent(record(&lower, "hash-lower")).await.unwrap();
    repo.create_if_absent(record(&upper, "hash-upper")).await.unwrap();
    repo.create_if_absent(record(&padded, "hash-padded")).await.unwrap();

    assert_eq!(repo.lookup(&lower).await.unwrap().unwrap().refresh_hash, "hash-lower");
    assert_eq!(repo.lookup(&upper).await.unwrap().unwrap().refresh_hash, "hash-upper");
    assert_eq!(repo.lookup(&padded).await.unwrap().unwrap().client_id, padded);
}

#[tokio::test]
async fn test_compare_and_overwrite_matches_hash_exactly() {
    let Some(repo) = setup().await else { return };
    let client_id = unique_client();
    repo.create_if_absent(record(&client_id, "$2b$04$abcdef")).await.unwrap();
    let expires_at = Utc::now() + Duration::days(31);

    assert!(!repo
        .compare_and_overwrite(&client_id, "$2B$04$ABCDEF", "hash-2", expires_at)
        .await
        .unwrap());
    assert_eq!(
        repo.lookup(&client_id).await.unwrap().unwrap().refresh_hash,
        "$2b$04$abcdef"
    );
}

#[tokio::test]
async fn test_lookup_missing() {
    let Some(repo) = setup().await else { return };

    assert!(repo.lookup(&unique_client()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_overwrite() {
    let Some(repo) = setup().await else { return };
    let client_id = unique_client();
    repo.create_if_absent(record(&client_id, "hash-1")).await.unwrap();

    let expires_at = (Utc::now() + Duration::days(3))
        .duration_trunc(Duration::microseconds(1))
        .unwrap();
    repo.overwrite(&client_id, "hash-2", expires_at).await.unwrap();

    // Same values again still count as an existing record
    repo.overwrite(&client_id, "hash-2", expires_at).await.unwrap();

    let found = repo.lookup(&client_id).await.unwrap().unwrap();
    assert_eq!(found.refresh_hash, "hash-2");
    assert_eq!(found.expires_at, expires_at);

    let missing = repo.overwrite(&unique_client(), "hash", expires_at).await;
    assert_eq!(missing, Err(StoreError::NotFound));
}

#[tokio::test]
async fn test_compare_and_overwrite() {
    let Some(repo) = setup().await else { return };
    let client_id = unique_client();
    repo.create_if_absent(record(&client_id, "hash-1")).await.unwrap();
    let expires_at = Utc::now() + Duration::days(31);

    assert!(!repo
        .compare_and_overwrite(&client_id, "stale", "hash-2", expires_at)
        .await
        .unwrap());
    assert!(repo
        .compare_and_overwrite(&client_id, "hash-1", "hash-2", expires_at)
        .await
        .unwrap());
    assert!(!repo
        .compare_and_overwrite(&client_id, "hash-1", "hash-3", expires_at)
        .await
        .unwrap());

    let found = repo.lookup(&client_id).await.unwrap().unwrap();
    assert_eq!(found.refresh_hash, "hash-2");

    let missing = repo
        .compare_and_overwrite(&unique_client(), "a", "b", expires_at)
        .await;
    assert_eq!(missing, Err(StoreError::NotFound));
}
