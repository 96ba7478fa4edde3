//! Authentication and account management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        enums::UserRole,
        user::{CreateUser, User, UserClaims},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Create a new account. Unauthenticated signups are always citizens;
    /// operator and admin accounts can only be created by an admin.
    pub async fn signup(&self, request: CreateUser, actor: Option<&UserClaims>) -> AppResult<User> {
        let role = request.role.unwrap_or(UserRole::Citizen);

        if role != UserRole::Citizen {
            match actor {
                Some(claims) => claims.require_admin()?,
                None => {
                    return Err(AppError::Authorization(format!(
                        "Creating {} accounts requires administrator privileges",
                        role
                    )))
                }
            }
        }

        // Operators must be attached to an existing institution; the
        // affiliation is meaningless for other roles.
        let institution_id = match role {
            UserRole::Operator => {
                let id = request.institution_id.ok_or_else(|| {
                    AppError::Validation("Operators require an institution_id".to_string())
                })?;
                self.repository.institutions.get_by_id(id).await?;
                Some(id)
            }
            _ => None,
        };

        if self.repository.users.email_exists(&request.email).await? {
            return Err(AppError::Conflict(
                "A user with this email already exists".to_string(),
            ));
        }

        let password_hash = self.hash_password(&request.password)?;

        self.repository
            .users
            .create(&request.name, &request.email, &password_hash, role, institution_id)
            .await
    }

    /// Create the configured admin account if its email is not taken yet.
    /// Idempotent; runs once at startup.
    pub async fn bootstrap_admin(&self) -> AppResult<()> {
        let (Some(email), Some(password)) =
            (self.config.admin_email.clone(), self.config.admin_password.clone())
        else {
            return Ok(());
        };

        if self.repository.users.email_exists(&email).await? {
            return Ok(());
        }

        let password_hash = self.hash_password(&password)?;
        self.repository
            .users
            .create("Administrator", &email, &password_hash, UserRole::Admin, None)
            .await?;

        tracing::info!("Bootstrap admin account created: {}", email);

        Ok(())
    }

    /// Authenticate by email and password, returning a JWT token
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !user.is_active {
            return Err(AppError::Authentication("Account is disabled".to_string()));
        }

        if !self.verify_password(&user.password_hash, password)? {
            return Err(AppError::Authentication("Invalid email or password".to_string()));
        }

        self.repository.users.update_last_login(user.id).await?;

        let token = self.create_token(&user)?;

        Ok((token, user))
    }

    /// Get the account behind a set of claims
    pub async fn me(&self, claims: &UserClaims) -> AppResult<User> {
        self.repository.users.get_by_id(claims.user_id).await
    }

    fn create_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.email.clone(),
            user_id: user.id,
            role: user.role,
            institution_id: user.institution_id,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Hash a password with argon2. All credentials are stored hashed;
    /// there is no plaintext path.
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    /// Verify a password against a stored argon2 hash
    pub fn verify_password(&self, password_hash: &str, password: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(password_hash)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
