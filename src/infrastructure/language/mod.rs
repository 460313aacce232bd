//! Language catalog adapters and the read-only catalog service

mod cached_repository;
mod postgres_repository;
mod repository;
mod service;

pub use cached_repository::CachedLanguageRepository;
pub use postgres_repository::PostgresLanguageRepository;
pub use repository::InMemoryLanguageRepository;
pub use service::LanguageCatalogService;
