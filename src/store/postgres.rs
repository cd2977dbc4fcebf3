use super::UserStore;
use crate::error::AppError;
use crate::models::{NewUser, User};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use uuid::Uuid;

/// Partial unique index over the emails of live users.
pub const LIVE_EMAIL_INDEX: &str = "users_email_live_idx";

const USER_COLUMNS: &str =
    "id, name, email, password_hash, age, member_number, created_at, updated_at, deleted_at";

/// `UserStore` backed by the `users` table in Postgres.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool and brings the schema up to date.
    pub async fn connect(
        options: PgConnectOptions,
        max_connections: u32,
    ) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                log::error!("migration failed: {}", e);
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (id, name, email, password_hash, age)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            USER_COLUMNS
        );
        let created = sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.age)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<User, AppError> {
        let sql = format!(
            "SELECT {} FROM users WHERE email = $1 AND deleted_at IS NULL",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        user.ok_or_else(AppError::user_not_found)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<User, AppError> {
        let sql = format!(
            "SELECT {} FROM users WHERE id = $1 AND deleted_at IS NULL",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        user.ok_or_else(AppError::user_not_found)
    }

    async fn list_all_users(&self) -> Result<Vec<User>, AppError> {
        let sql = format!(
            "SELECT {} FROM users WHERE deleted_at IS NULL ORDER BY member_number",
            USER_COLUMNS
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn save_user(&self, user: &User) -> Result<User, AppError> {
        let sql = format!(
            "UPDATE users
             SET name = $1, email = $2, password_hash = $3, age = $4, updated_at = NOW()
             WHERE id = $5 AND deleted_at IS NULL
             RETURNING {}",
            USER_COLUMNS
        );
        let saved = sqlx::query_as::<_, User>(&sql)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.age)
            .bind(user.id)
            .fetch_optional(&self.pool)
            .await?;

        saved.ok_or_else(AppError::user_not_found)
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::user_not_found());
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    // Needs a disposable Postgres database in DATABASE_URL.
    #[ignore]
    #[actix_rt::test]
    async fn test_postgres_user_lifecycle() {
        dotenv::dotenv().ok();
        let url = env::var("DATABASE_URL").expect("DATABASE_URL not set");
        let options: PgConnectOptions = url.parse().unwrap();
        let store = PgUserStore::connect(options, 2).await.unwrap();

        let email = format!("{}@lifecycle.test", Uuid::new_v4());
        let first = store
            .create_user(NewUser::new("Ana".into(), email.clone(), "hash".into(), 25))
            .await
            .unwrap();
        let second = store
            .create_user(NewUser::new("Bia".into(), format!("b{}", email), "hash".into(), 30))
            .await
            .unwrap();
        assert!(second.member_number > first.member_number);

        let duplicate = store
            .create_user(NewUser::new("Ana".into(), email.clone(), "hash".into(), 25))
            .await;
        assert!(matches!(duplicate, Err(AppError::Conflict(_))));

        let found = store.find_user_by_email(&email).await.unwrap();
        assert_eq!(found.id, first.id);

        store.delete_user(first.id).await.unwrap();
        assert!(matches!(
            store.find_user_by_id(first.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_user(first.id).await,
            Err(AppError::NotFound(_))
        ));

        // The email is free again once its holder is deleted.
        store
            .create_user(NewUser::new("Ana".into(), email, "hash".into(), 25))
            .await
            .unwrap();
    }
}
