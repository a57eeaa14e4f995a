use jsonwebtoken::TokenData;
use crate::{entities::{token::Claims, user::User}, errors::AuthError};


pub trait TokenServiceRepository: Send + Sync {
    /// Creates a new access token for the user
    fn create_jwt(&self, user: &User) -> Result<String, AuthError>;

    /// Decodes an access token and returns its claims
    fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError>;
}
