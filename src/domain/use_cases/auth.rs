use uuid::Uuid;
use validator::Validate;

use crate::entities::token::AuthResponse;
use crate::entities::user::{normalize_email, LoginUser, NewUser, User, UserSummary};
use crate::errors::{AppError, AuthError};
use crate::interfaces::repositories::user::UserRepository;
use crate::auth::password::{hash_password, verify_password};
use crate::repositories::token::TokenServiceRepository;
use crate::use_cases::extractors::AuthUser;

pub struct AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenServiceRepository,
{
    pub user_repo: R,
    pub token_service: T,
}

impl<R, T> AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenServiceRepository,
{
    pub fn new(user_repo: R, token_service: T) -> Self {
        AuthHandler {
            user_repo,
            token_service
        }
    }

    /// Registers a new user after validation and password hashing
    pub async fn register(&self, request: NewUser) -> Result<AuthResponse, AppError> {
        request.validate()?;

        let hashed_password = hash_password(&request.password)?;
        let user_insert = request.prepare_for_insert(hashed_password);

        let user = self.user_repo.create_user(&user_insert).await?;
        tracing::info!(user_id = %user.id, "User registered");

        self.create_auth_response(&user)
    }

    /// Logs in a user by checking credentials and issuing a token
    pub async fn login(&self, request: LoginUser) -> Result<AuthResponse, AppError> {
        request.validate()?;

        let user = self.user_repo
            .get_user_by_email(&normalize_email(&request.email))
            .await?
            .ok_or(AuthError::WrongCredentials)?;

        let is_password_valid = verify_password(&request.password, &user.password_hash)
            .map_err(|e| {
                tracing::warn!("Password verification failed: {}", e);
                AuthError::WrongCredentials
            })?;
        if !is_password_valid {
            return Err(AuthError::WrongCredentials.into());
        }

        tracing::info!(user_id = %user.id, "User logged in");
        self.create_auth_response(&user)
    }

    pub fn create_auth_response(&self, user: &User) -> Result<AuthResponse, AppError> {
        let token = self.token_service.create_jwt(user)
            .map_err(|e| {
                tracing::warn!("Failed to create JWT: {}", e);
                AuthError::TokenCreation
            })?;

        Ok(AuthResponse::new(UserSummary::from(user), token))
    }

    /// Resolves a bearer token to the identity it was issued for
    pub fn authenticate(&self, token: &str) -> Result<AuthUser, AuthError> {
        let claims = self.token_service.decode_jwt(token)?.claims;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthUser {
            user_id,
            name: claims.name,
        })
    }
}
