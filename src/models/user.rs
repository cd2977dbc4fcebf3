use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A user as stored in the `users` table and returned by the API.
///
/// The password hash is loaded from the row but never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Opaque identifier (UUID v4), assigned once before the first insert.
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// bcrypt hash of the password.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub age: i32,
    /// Assigned by the store from a monotonically increasing sequence.
    pub member_number: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Non-null marks the row as soft-deleted.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A user that has passed validation and is ready for its first insert.
///
/// Store-managed columns (`member_number`, timestamps) are filled in on insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub age: i32,
}

impl NewUser {
    /// Creates a new `NewUser` and generates its identifier.
    pub fn new(name: String, email: String, password_hash: String, age: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            age,
        }
    }
}

/// Body of `POST /users/create`. Every field is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub age: i32,
}

/// Body of the update routes. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    /// A new plaintext password. Hashed again only when present.
    pub password: Option<String>,
    pub age: Option<i32>,
}

impl User {
    /// Overwrites the profile fields present in `changes`.
    ///
    /// The password hash is left alone; replacing it is the caller's job once
    /// the new plaintext has been validated and hashed.
    pub fn apply(&mut self, changes: &UpdateUserRequest) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(email) = &changes.email {
            self.email = email.clone();
        }
        if let Some(age) = changes.age {
            self.age = age;
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
