use jsonwebtoken::{encode, Header, decode, Validation, TokenData, Algorithm};
use chrono::{Utc, Duration};
use crate::entities::token::Claims;
use crate::entities::user::User;
use crate::repositories::token::TokenServiceRepository;
use crate::settings::{AppConfig, JwtKeys};
use crate::errors::AuthError;

const JWT_ALGORITHM: Algorithm = Algorithm::HS512;


#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    access_expiration: Duration,
}

impl JwtService {
    pub fn new(config: &AppConfig) -> Self {
        JwtService {
            keys: JwtKeys::from(config),
            access_expiration: Duration::minutes(config.jwt_expiration_minutes),
        }
    }

    pub fn create_jwt(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = (now + self.access_expiration).timestamp().max(0) as usize;

        let claims = Claims {
            sub: user.id.to_string(),
            name: user.name.clone(),
            exp,
            iat: now.timestamp() as usize,
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.keys.encoding).map_err(|e| {
            tracing::error!("JWT encoding failed: {}", e);
            AuthError::TokenCreation
        })
    }

    pub fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;

        decode::<Claims>(token, &self.keys.decoding, &validation).map_err(AuthError::from)
    }
}

impl TokenServiceRepository for JwtService {
    fn create_jwt(&self, user: &User) -> Result<String, AuthError> {
        self.create_jwt(user)
    }

    fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        self.decode_jwt(token)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::settings::AppEnvironment;

    fn config(secret: &str, minutes: i64) -> AppConfig {
        AppConfig {
            env: AppEnvironment::Testing,
            name: "Jobs-API".into(),
            port: 0,
            host: "127.0.0.1".into(),
            worker_count: 1,
            database_url: "postgres://localhost/jobs".into(),
            database_max_connections: 1,
            cors_allowed_origins: vec!["*".into()],
            jwt_secret: secret.into(),
            jwt_expiration_minutes: minutes,
            rate_limit_max_requests: 100,
            rate_limit_window_secs: 900,
            trust_proxy: false,
        }
    }

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Grace".into(),
            email: "grace@example.com".into(),
            password_hash: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn issued_tokens_decode_to_the_same_user() {
        let service = JwtService::new(&config("jwt_unit_test_secret_long_enough_for_hs512", 60));
        let user = user();

        let token = service.create_jwt(&user).unwrap();
        let claims = service.decode_jwt(&token).unwrap().claims;

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.name, "Grace");
    }

    #[test]
    fn expired_tokens_are_rejected() {
        // Well past the default 60s leeway
        let service = JwtService::new(&config("jwt_unit_test_secret_long_enough_for_hs512", -10));

        let token = service.create_jwt(&user()).unwrap();

        assert_eq!(service.decode_jwt(&token).unwrap_err(), AuthError::TokenExpired);
    }

    #[test]
    fn tokens_signed_with_another_secret_are_rejected() {
        let issuer = JwtService::new(&config("jwt_unit_test_secret_long_enough_for_hs512", 60));
        let verifier = JwtService::new(&config("a_completely_different_secret_of_enough_length", 60));

        let token = issuer.create_jwt(&user()).unwrap();

        assert_eq!(verifier.decode_jwt(&token).unwrap_err(), AuthError::InvalidToken);
    }
}
