//! Persistence gateway for users.
//!
//! Lookups only ever see live rows: a soft-deleted user is indistinguishable
//! from one that never existed. Missing rows come back as
//! `AppError::NotFound`, duplicate live emails as `AppError::Conflict`, and
//! anything else the backend reports as `AppError::DatabaseError`.

pub mod memory;
pub mod postgres;

use crate::error::AppError;
use crate::models::{NewUser, User};
use async_trait::async_trait;
use uuid::Uuid;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user. The live-email uniqueness constraint is enforced here
    /// even when the caller already checked.
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<User, AppError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<User, AppError>;

    /// All live users, oldest member first.
    async fn list_all_users(&self) -> Result<Vec<User>, AppError>;

    /// Overwrites the mutable fields of the live row with `user.id`.
    async fn save_user(&self, user: &User) -> Result<User, AppError>;

    /// Soft-deletes the live row with `id`. Deleting twice yields `NotFound`.
    async fn delete_user(&self, id: Uuid) -> Result<(), AppError>;

    /// Cheap round trip used by the health check.
    async fn ping(&self) -> Result<(), AppError>;
}
