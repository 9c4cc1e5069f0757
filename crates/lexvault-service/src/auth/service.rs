//! Authentication service: credential checks and token handling.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use lexvault_auth::jwt::{JwtDecoder, JwtEncoder};
use lexvault_auth::password::PasswordHasher;
use lexvault_core::error::AppError;
use lexvault_core::events::{AuditAction, AuditEvent};
use lexvault_core::result::AppResult;
use lexvault_core::traits::AuditSink;
use lexvault_database::repositories::UserRepository;
use lexvault_entity::user::UserProfile;

use crate::audit;
use crate::context::RequestContext;

/// Credentials presented at sign-in.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// E-mail.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Successful sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token.
    pub token: String,
    /// The signed-in account.
    pub user: UserProfile,
}

/// Verifies credentials and tokens.
#[derive(Clone)]
pub struct AuthService {
    user_repo: Arc<UserRepository>,
    hasher: Arc<PasswordHasher>,
    encoder: Arc<JwtEncoder>,
    decoder: Arc<JwtDecoder>,
    audit: Arc<dyn AuditSink>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish()
    }
}

impl AuthService {
    /// Creates a new authentication service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        hasher: Arc<PasswordHasher>,
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            encoder,
            decoder,
            audit,
        }
    }

    /// Sign in with e-mail and password.
    ///
    /// Unknown e-mail and wrong password produce the same error.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        ip_address: Option<String>,
    ) -> AppResult<LoginResponse> {
        let request = LoginRequest {
            email: email.trim().to_lowercase(),
            password: password.to_string(),
        };
        request
            .validate()
            .map_err(|e| AppError::invalid_input(format!("Invalid login request: {e}")))?;

        let Some(user) = self.user_repo.find_by_email(&request.email).await? else {
            warn!(email = %request.email, "Login for unknown account");
            return Err(AppError::authentication("Invalid credentials"));
        };

        if !self
            .hasher
            .verify_password(&request.password, &user.password_hash)?
        {
            warn!(user_id = %user.id, "Login with wrong password");
            return Err(AppError::authentication("Invalid credentials"));
        }

        let (token, expires_at) = self.encoder.issue(&user)?;

        audit::record(
            self.audit.as_ref(),
            AuditEvent::new(user.id, AuditAction::Login, "user")
                .entity(user.id)
                .ip(ip_address),
        )
        .await;

        info!(user_id = %user.id, %expires_at, "User logged in");
        Ok(LoginResponse {
            token,
            user: user.profile(),
        })
    }

    /// Resolve a bearer token into a request context.
    ///
    /// The account must still exist; its current role is used.
    pub async fn authenticate(
        &self,
        token: &str,
        ip_address: Option<String>,
    ) -> AppResult<RequestContext> {
        let claims = self.decoder.decode(token)?;
        let user = self
            .user_repo
            .find_by_id(claims.user_id())
            .await?
            .ok_or_else(|| AppError::authentication("Account no longer exists"))?;

        Ok(RequestContext::new(user.id, user.email, user.role, ip_address))
    }
}
