use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use storage::repository::UserRepository;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{WebError, WebResult};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 signing and verification keys.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn issue(&self, user_id: Uuid, email: &str) -> jsonwebtoken::errors::Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
    }

    pub fn verify(&self, token: &str) -> jsonwebtoken::errors::Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims)
    }
}

pub fn hash_password(plain: &str) -> WebResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| WebError::InternalServerError(format!("Password hashing failed: {}", e)))
}

pub fn verify_password(plain: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(plain.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub roles: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Check credentials and issue a token
pub async fn login(
    users: &dyn UserRepository,
    tokens: &TokenKeys,
    email: &str,
    password: &str,
) -> WebResult<LoginResponse> {
    let user = users
        .find_by_email(email)
        .await?
        .ok_or(WebError::InvalidCredentials("Invalid credentials"))?;

    let hash = user
        .password_hash
        .as_deref()
        .ok_or(WebError::InvalidCredentials("Password not set"))?;

    if !verify_password(password, hash) {
        tracing::warn!("Failed login for {}", email);
        return Err(WebError::InvalidCredentials("Invalid credentials"));
    }

    let token = tokens
        .issue(user.id, &user.email)
        .map_err(|e| WebError::InternalServerError(format!("Token signing failed: {}", e)))?;
    let roles = users.roles_for(user.id).await?;

    Ok(LoginResponse {
        token,
        user: UserProfile {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            roles,
        },
    })
}
