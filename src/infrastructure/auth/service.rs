//! Login flows: credential login and OAuth upsert login

use std::sync::Arc;

use rand::Rng;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::user::{AuthProvider, User, UserRepository, UserRole};
use crate::domain::DomainError;

use super::jwt::JwtGenerator;
use crate::infrastructure::user::PasswordHasher;

/// Outcome of a successful credential login
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub token: String,
    pub user: User,
}

/// Identity assertion received from an OAuth callback.
///
/// The assertion itself is verified upstream; this service trusts it.
#[derive(Debug, Clone)]
pub struct OAuthLoginRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub provider: AuthProvider,
    pub provider_id: String,
}

/// Outcome of an OAuth upsert login
#[derive(Debug, Clone)]
pub struct OAuthLoginResult {
    pub token: String,
    pub user: User,
    pub is_new_user: bool,
}

/// Authentication service issuing session tokens.
///
/// Failure on the credential path is uniform: unknown email, inactive
/// account and wrong password all surface as `InvalidCredentials`, so a
/// caller cannot enumerate accounts.
#[derive(Debug)]
pub struct AuthService<R: UserRepository, H: PasswordHasher, J: JwtGenerator> {
    repository: Arc<R>,
    hasher: Arc<H>,
    jwt: Arc<J>,
    default_role: UserRole,
}

impl<R: UserRepository, H: PasswordHasher, J: JwtGenerator> AuthService<R, H, J> {
    pub fn new(repository: Arc<R>, hasher: Arc<H>, jwt: Arc<J>, default_role: UserRole) -> Self {
        Self {
            repository,
            hasher,
            jwt,
            default_role,
        }
    }

    /// Authenticate with email and password and mint a session token
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedUser, DomainError> {
        let email = email.trim().to_lowercase();

        let user = match self.repository.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                warn!(email = %email, "login failed: unknown email");
                return Err(DomainError::invalid_credentials(email));
            }
        };

        if !user.is_active() {
            warn!(email = %email, "login failed: account is not active");
            return Err(DomainError::invalid_credentials(email));
        }

        if !self.hasher.verify(password, user.password_hash()) {
            warn!(email = %email, "login failed: wrong password");
            return Err(DomainError::invalid_credentials(email));
        }

        let token = self.jwt.generate(&user)?;
        info!(user_id = ?user.id(), email = %user.email(), "login successful");

        Ok(AuthenticatedUser { token, user })
    }

    /// Upsert-login from an OAuth identity assertion.
    ///
    /// A known email reuses the account, syncing the asserted name; an
    /// unknown email creates an active account whose stored credential is a
    /// random placeholder that can never verify as a password.
    pub async fn login_with_oauth(
        &self,
        request: OAuthLoginRequest,
    ) -> Result<OAuthLoginResult, DomainError> {
        let email = request.email.trim().to_lowercase();

        let (user, is_new_user) = match self.repository.find_by_email(&email).await? {
            Some(mut user) => {
                // Providers are not persisted, so an assertion from a
                // different provider for the same email is indistinguishable
                // from the first one; leave a trace for operators.
                warn!(
                    email = %email,
                    provider = %request.provider,
                    "oauth login for existing account"
                );

                let name_changed = user.first_name() != request.first_name
                    || user.last_name() != request.last_name;

                if name_changed {
                    user.set_name(request.first_name, request.last_name);
                    user = self.repository.save(user).await?;
                    info!(user_id = ?user.id(), "synced profile name from oauth provider");
                }

                (user, false)
            }
            None => {
                let user = User::new(
                    &email,
                    generate_password_placeholder(),
                    request.first_name,
                    request.last_name,
                    Uuid::new_v4().to_string(),
                    self.default_role,
                );

                let user = self.repository.save(user).await?;
                info!(
                    user_id = ?user.id(),
                    email = %user.email(),
                    provider = %request.provider,
                    "created new account from oauth login"
                );

                (user, true)
            }
        };

        let token = self.jwt.generate(&user)?;

        Ok(OAuthLoginResult {
            token,
            user,
            is_new_user,
        })
    }
}

/// Random credential stored for OAuth-created accounts.
///
/// Not a valid PHC string, so `PasswordHasher::verify` always rejects it:
/// password login stays permanently disabled for these accounts.
fn generate_password_placeholder() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}
