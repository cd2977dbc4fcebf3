use crate::error::AppError;
use bcrypt::{hash, verify, DEFAULT_COST};

/// Hashes a plaintext password with a fresh salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    Ok(hash(password, DEFAULT_COST)?)
}

pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    Ok(verify(password, hashed_password)?)
}

/// Hashes on the blocking thread pool so the worker thread stays free.
pub async fn hash_password_blocking(password: String) -> Result<String, AppError> {
    actix_web::web::block(move || hash_password(&password))
        .await
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))?
}
