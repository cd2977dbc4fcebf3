use super::UserStore;
use crate::error::AppError;
use crate::models::{NewUser, User};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Table {
    // Soft-deleted rows stay in place, like they do in Postgres.
    rows: Vec<User>,
    last_member_number: i64,
}

impl Table {
    fn live(&self) -> impl Iterator<Item = &User> {
        self.rows.iter().filter(|u| !u.is_deleted())
    }

    fn live_mut(&mut self, id: Uuid) -> Option<&mut User> {
        self.rows.iter_mut().find(|u| u.id == id && !u.is_deleted())
    }

    fn email_taken_by_other(&self, email: &str, id: Uuid) -> bool {
        self.live().any(|u| u.email == email && u.id != id)
    }
}

/// `UserStore` kept in process memory.
///
/// Applies the same rules as the Postgres schema: live emails are unique,
/// member numbers only grow, deletes are soft. Cloning shares the table.
#[derive(Debug, Default, Clone)]
pub struct MemoryUserStore {
    table: Arc<RwLock<Table>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows including soft-deleted ones.
    pub async fn row_count(&self) -> usize {
        self.table.read().await.rows.len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut table = self.table.write().await;

        if table.email_taken_by_other(&user.email, user.id) {
            return Err(AppError::email_taken());
        }
        if table.rows.iter().any(|u| u.id == user.id) {
            return Err(AppError::DatabaseError(format!(
                "duplicate primary key {}",
                user.id
            )));
        }
        if user.age < 0 {
            return Err(AppError::DatabaseError("age check constraint".into()));
        }

        table.last_member_number += 1;
        let now = Utc::now();
        let created = User {
            id: user.id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            age: user.age,
            member_number: table.last_member_number,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        table.rows.push(created.clone());

        Ok(created)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<User, AppError> {
        let table = self.table.read().await;
        let user = table.live().find(|u| u.email == email).cloned();
        user.ok_or_else(AppError::user_not_found)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<User, AppError> {
        let table = self.table.read().await;
        let user = table.live().find(|u| u.id == id).cloned();
        user.ok_or_else(AppError::user_not_found)
    }

    async fn list_all_users(&self) -> Result<Vec<User>, AppError> {
        let table = self.table.read().await;
        let mut users: Vec<User> = table.live().cloned().collect();
        users.sort_by_key(|u| u.member_number);
        Ok(users)
    }

    async fn save_user(&self, user: &User) -> Result<User, AppError> {
        let mut table = self.table.write().await;

        // A missing row wins over a conflicting email, as with `UPDATE ... WHERE id`.
        if !table.live().any(|u| u.id == user.id) {
            return Err(AppError::user_not_found());
        }
        if table.email_taken_by_other(&user.email, user.id) {
            return Err(AppError::email_taken());
        }
        if user.age < 0 {
            return Err(AppError::DatabaseError("age check constraint".into()));
        }

        let row = table.live_mut(user.id).ok_or_else(AppError::user_not_found)?;
        row.name = user.name.clone();
        row.email = user.email.clone();
        row.password_hash = user.password_hash.clone();
        row.age = user.age;
        row.updated_at = Utc::now();

        Ok(row.clone())
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), AppError> {
        let mut table = self.table.write().await;
        let row = table.live_mut(id).ok_or_else(AppError::user_not_found)?;
        let now = Utc::now();
        row.deleted_at = Some(now);
        row.updated_at = now;
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
