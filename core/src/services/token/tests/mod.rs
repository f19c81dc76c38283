
use crate::repositories::InMemoryTokenRepository;
use crate::services::token::{SigningKey, TokenService, TokenServiceConfig};

/// Low bcrypt cost keeps the suite fast
pub(super) const TEST_HASH_COST: u32 = 4;

pub(super) fn test_config(key: &str) -> TokenServiceConfig {
    TokenServiceConfig::new(SigningKey::new(key)).with_hash_cost(TEST_HASH_COST)
}

pub(super) fn create_service() -> (TokenService<InMemoryTokenRepository>, InMemoryTokenRepository) {
    create_service_with(test_config("test-signing-key"))
}

pub(super) fn create_service_with(
    config: TokenServiceConfig,
) -> (TokenService<InMemoryTokenRepository>, InMemoryTokenRepository) {
    let repository = InMemoryTokenRepository::new();
    let service = TokenService::new(repository.clone(), config).unwrap();
    (service, repository)
}
