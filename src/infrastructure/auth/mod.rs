//! Token issuing and the login flows

mod jwt;
mod service;

pub use jwt::{JwtClaims, JwtConfig, JwtGenerator, JwtService};
pub use service::{AuthService, AuthenticatedUser, OAuthLoginRequest, OAuthLoginResult};
