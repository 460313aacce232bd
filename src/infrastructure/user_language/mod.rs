//! User-language association adapters and the manager service

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresUserLanguageRepository;
pub use repository::InMemoryUserLanguageRepository;
pub use service::UserLanguageService;
