use serde::{ Serialize, Deserialize };

use crate::entities::user::UserSummary;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserSummary,
    pub token: String,
    pub token_type: String,
}

impl AuthResponse {
    pub fn new(user: UserSummary, token: String) -> Self {
        AuthResponse {
            user,
            token,
            token_type: "Bearer".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub exp: usize,
    pub iat: usize,
}
