//! Lingua User Service
//!
//! User identity and language-learning-profile service:
//! - password and OAuth upsert login issuing JWT session tokens
//! - per-user language associations with a single native language
//! - a read-mostly language catalog seeded at startup

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::{info, warn};

use api::state::AppState;
use domain::language::{Language, LanguageRepository};
use domain::user::UserRepository;
use domain::user_language::UserLanguageRepository;
use domain::DomainError;
use infrastructure::auth::{AuthService, JwtConfig, JwtService};
use infrastructure::language::{
    CachedLanguageRepository, InMemoryLanguageRepository, LanguageCatalogService,
    PostgresLanguageRepository,
};
use infrastructure::user::{Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, UserService};
use infrastructure::user_language::{
    InMemoryUserLanguageRepository, PostgresUserLanguageRepository, UserLanguageService,
};

/// Create the application state with all services initialized
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let jwt_service = Arc::new(JwtService::new(JwtConfig::new(
        resolve_jwt_secret(config),
        config.auth.jwt_expiration_hours,
    )));

    let cache_ttl = Duration::from_secs(config.catalog.cache_ttl_seconds);
    let use_postgres = config.storage.backend == "postgres";

    info!("Storage backend: {}", config.storage.backend);

    if use_postgres {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        info!("Connecting to PostgreSQL...");
        let pool = sqlx::PgPool::connect(&database_url)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to connect to PostgreSQL: {e}"))?;
        info!("PostgreSQL connection established");

        let language_repository = Arc::new(CachedLanguageRepository::new(
            PostgresLanguageRepository::new(pool.clone()),
            cache_ttl,
        ));

        if config.catalog.seed_defaults {
            seed_language_catalog(language_repository.as_ref()).await?;
        }

        Ok(build_state(
            Arc::new(PostgresUserRepository::new(pool.clone())),
            language_repository,
            Arc::new(PostgresUserLanguageRepository::new(pool)),
            jwt_service,
            config,
        ))
    } else {
        let language_repository = Arc::new(CachedLanguageRepository::new(
            InMemoryLanguageRepository::new(),
            cache_ttl,
        ));

        if config.catalog.seed_defaults {
            seed_language_catalog(language_repository.as_ref()).await?;
        }

        Ok(build_state(
            Arc::new(InMemoryUserRepository::new()),
            language_repository,
            Arc::new(InMemoryUserLanguageRepository::new()),
            jwt_service,
            config,
        ))
    }
}

fn build_state<U, L, UL>(
    user_repository: Arc<U>,
    language_repository: Arc<L>,
    user_language_repository: Arc<UL>,
    jwt_service: Arc<JwtService>,
    config: &AppConfig,
) -> AppState
where
    U: UserRepository + 'static,
    L: LanguageRepository + 'static,
    UL: UserLanguageRepository + 'static,
{
    let hasher = Arc::new(Argon2Hasher::new());
    let default_role = config.users.default_role;

    let auth_service = Arc::new(AuthService::new(
        user_repository.clone(),
        hasher.clone(),
        jwt_service.clone(),
        default_role,
    ));

    let user_service = Arc::new(UserService::new(
        user_repository.clone(),
        hasher,
        default_role,
    ));

    let catalog_service = Arc::new(LanguageCatalogService::new(
        language_repository.clone(),
        config.catalog.starting_language_ids.clone(),
    ));

    let user_language_service = Arc::new(UserLanguageService::new(
        user_language_repository,
        language_repository,
        user_repository,
    ));

    AppState::new(
        auth_service,
        user_service,
        catalog_service,
        user_language_service,
        jwt_service,
    )
}

/// Resolve the JWT signing secret: config, then env, then a random
/// per-process value
fn resolve_jwt_secret(config: &AppConfig) -> String {
    config
        .auth
        .jwt_secret
        .clone()
        .or_else(|| std::env::var("JWT_SECRET").ok())
        .unwrap_or_else(|| {
            warn!(
                "No JWT secret configured. Generating a random secret; \
                 sessions will NOT survive a restart. Set auth.jwt_secret \
                 or the JWT_SECRET environment variable."
            );
            generate_random_secret()
        })
}

fn generate_random_secret() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Load the standard language set into an empty catalog
async fn seed_language_catalog<R: LanguageRepository>(repository: &R) -> Result<(), DomainError> {
    let existing = repository.count().await?;
    if existing > 0 {
        info!(
            "Catalog already contains {} languages, skipping initialization",
            existing
        );
        return Ok(());
    }

    info!("Initializing language catalog...");

    let languages = default_languages()?;
    let total = languages.len();

    for language in languages {
        repository.save(language).await?;
    }

    info!("Seeded {} languages into the catalog", total);
    Ok(())
}

fn default_languages() -> Result<Vec<Language>, DomainError> {
    [
        ("Spanish", "es"),
        ("French", "fr"),
        ("German", "de"),
        ("Italian", "it"),
        ("Portuguese", "pt"),
        ("English", "en"),
        ("Japanese", "ja"),
        ("Korean", "ko"),
        ("Chinese", "zh"),
        ("Russian", "ru"),
    ]
    .into_iter()
    .map(|(name, code)| Language::new(name, code, format!("https://flagcdn.com/{code}.svg")))
    .collect()
}
