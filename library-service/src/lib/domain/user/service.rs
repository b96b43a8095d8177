use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RawPassword;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Credential store: registration, lookup and login checks.
///
/// Argon2 work runs on the blocking pool.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>) -> Self {
        Self { repository }
    }
}

async fn hash_password(password: RawPassword) -> Result<String, UserError> {
    tokio::task::spawn_blocking(move || PasswordHasher::new().hash(password.expose()))
        .await
        .map_err(|e| UserError::Unknown(format!("Password hashing task failed: {}", e)))?
        .map_err(UserError::from)
}

/// `false` on mismatch and on a malformed stored hash. The latter is logged.
async fn verify_password(password: RawPassword, stored_hash: Option<String>) -> bool {
    let outcome = tokio::task::spawn_blocking(move || {
        let hasher = PasswordHasher::new();
        match stored_hash {
            Some(hash) => hasher.verify(password.expose(), &hash),
            None => {
                hasher.verify_dummy(password.expose());
                Ok(false)
            }
        }
    })
    .await;

    match outcome {
        Ok(Ok(matches)) => matches,
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Stored password hash could not be parsed");
            false
        }
        Err(e) => {
            tracing::error!(error = %e, "Password verification task failed");
            false
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        let password_hash = hash_password(command.password).await?;

        let user = self
            .repository
            .create(NewUser {
                email: command.email,
                name: command.name,
                password_hash,
                is_active: true,
                is_staff: false,
            })
            .await?;

        tracing::info!(user_id = %user.id, email = %user.email, "User registered");

        Ok(user)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        self.repository.find_by_email(email).await
    }

    async fn authenticate(&self, command: LoginCommand) -> Result<User, UserError> {
        let user = self.repository.find_by_email(&command.email).await?;

        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let password_matches = verify_password(command.password, stored_hash).await;

        match user {
            Some(user) if password_matches && user.is_active => Ok(user),
            Some(user) if password_matches => {
                tracing::info!(user_id = %user.id, "Login refused for inactive user");
                Err(UserError::InvalidCredentials)
            }
            _ => Err(UserError::InvalidCredentials),
        }
    }

    async fn get_users_by_ids(&self, user_ids: &[UserId]) -> Result<Vec<User>, UserError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.repository.find_by_ids(user_ids).await
    }
}
