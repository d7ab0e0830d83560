//! User registration, login, profile management and bearer tokens.
//!
//! Passwords are hashed with Argon2 (PHC string format). Tokens are HS256
//! JWTs carrying the user id and email, valid for a configurable number of
//! hours.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::{AppError, is_unique_violation},
    models::user::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest, User},
    money,
    validation::{is_valid_email, is_valid_phone, required},
};

const MIN_PASSWORD_LEN: usize = 6;

/// Default account created at startup for manual testing.
pub const DEFAULT_USER_EMAIL: &str = "user@example.com";
pub const DEFAULT_USER_PASSWORD: &str = "password123";

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub email: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

/// Signing and verification keys for bearer tokens.
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Issue a token for a user.
    pub fn issue(&self, user_id: Uuid, email: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Verify signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding, &validation).map(|data| data.claims)
    }
}

/// Hash a password on the blocking pool. Argon2 is CPU-bound.
async fn hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Hashing failed: {e}")))
    })
    .await
    .map_err(|e| AppError::Internal(format!("Hashing task failed: {e}")))?
}

async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&hash)
            .map_err(|e| AppError::Internal(format!("Invalid hash format: {e}")))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|e| AppError::Internal(format!("Verification task failed: {e}")))?
}

/// Register a new user with the opening wallet balance and issue a token.
///
/// # Errors
///
/// - `Validation`: missing field, bad email or phone, short password
/// - `UserExists`: email already registered
pub async fn register(
    pool: &DbPool,
    keys: &JwtKeys,
    request: RegisterRequest,
) -> Result<AuthResponse, AppError> {
    let (Some(email), Some(password), Some(name), Some(phone)) = (
        required(&request.email),
        required(&request.password),
        required(&request.name),
        required(&request.phone),
    ) else {
        return Err(AppError::Validation("All fields are required".to_string()));
    };

    if !is_valid_email(email) {
        return Err(AppError::Validation("Invalid email format".to_string()));
    }
    if !is_valid_phone(phone) {
        return Err(AppError::Validation(
            "Invalid phone number format".to_string(),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(
            "Password must be at least 6 characters long".to_string(),
        ));
    }

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
        .bind(email)
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        return Err(AppError::UserExists);
    }

    let password_hash = hash_password(password.to_string()).await?;
    let user = insert_user(pool, email, name, phone, &password_hash).await?;

    tracing::info!(user_id = %user.id, "user registered");

    let token = keys.issue(user.id, &user.email)?;
    Ok(AuthResponse {
        user: user.into(),
        token,
        token_type: "Bearer",
    })
}

async fn insert_user(
    pool: &DbPool,
    email: &str,
    name: &str,
    phone: &str,
    password_hash: &str,
) -> Result<User, AppError> {
    let now = Utc::now();
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, name, phone, password_hash, wallet_balance_paise, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(name)
    .bind(phone)
    .bind(password_hash)
    .bind(money::INITIAL_BALANCE_PAISE)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::UserExists
        } else {
            AppError::Database(e)
        }
    })
}

/// Authenticate with email and password and issue a token.
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login(
    pool: &DbPool,
    keys: &JwtKeys,
    request: LoginRequest,
) -> Result<AuthResponse, AppError> {
    let (Some(email), Some(password)) = (required(&request.email), required(&request.password))
    else {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    };

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(password.to_string(), user.password_hash.clone()).await? {
        return Err(AppError::InvalidCredentials);
    }

    let token = keys.issue(user.id, &user.email)?;
    Ok(AuthResponse {
        user: user.into(),
        token,
        token_type: "Bearer",
    })
}

pub async fn get_profile(pool: &DbPool, user_id: Uuid) -> Result<User, AppError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::UserNotFound)
}

/// Update name and phone. Email and balance are not client-editable.
pub async fn update_profile(
    pool: &DbPool,
    user_id: Uuid,
    request: UpdateProfileRequest,
) -> Result<User, AppError> {
    let (Some(name), Some(phone)) = (required(&request.name), required(&request.phone)) else {
        return Err(AppError::Validation(
            "Name and phone are required".to_string(),
        ));
    };

    if !is_valid_phone(phone) {
        return Err(AppError::Validation(
            "Invalid phone number format".to_string(),
        ));
    }

    sqlx::query_as::<_, User>(
        "UPDATE users SET name = ?, phone = ?, updated_at = ? WHERE id = ? RETURNING *",
    )
    .bind(name)
    .bind(phone)
    .bind(Utc::now())
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::UserNotFound)
}

/// Create the default test user if it does not exist yet.
pub async fn seed_default_user(pool: &DbPool) -> Result<bool, AppError> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
        .bind(DEFAULT_USER_EMAIL)
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        return Ok(false);
    }

    let password_hash = hash_password(DEFAULT_USER_PASSWORD.to_string()).await?;
    insert_user(
        pool,
        DEFAULT_USER_EMAIL,
        "Test User",
        "9876543210",
        &password_hash,
    )
    .await?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies() {
        let keys = JwtKeys::new("test-secret", 24);
        let user_id = Uuid::new_v4();
        let token = keys.issue(user_id, "asha@example.com").unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.email, "asha@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let token = JwtKeys::new("one", 24)
            .issue(Uuid::new_v4(), "a@b.co")
            .unwrap();
        assert!(JwtKeys::new("two", 24).verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        // Well past the default 60 second leeway.
        let keys = JwtKeys::new("test-secret", -1);
        let token = keys.issue(Uuid::new_v4(), "a@b.co").unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[tokio::test]
    async fn password_hash_round_trip() {
        let hash = hash_password("password123".to_string()).await.unwrap();
        assert!(verify_password("password123".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("wrong-pass".to_string(), hash).await.unwrap());
    }
}
