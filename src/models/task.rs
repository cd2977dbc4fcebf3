use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Value of `tasks.status` when none is given. Matches the column default.
pub const DEFAULT_TASK_STATUS: &str = "pending";

fn default_status() -> String {
    DEFAULT_TASK_STATUS.to_string()
}

/// A task owned by a user, as stored in the `tasks` table.
///
/// Tasks have no endpoints of their own; the table exists so that users can
/// own them. Soft-deleting a user leaves its tasks untouched.
#[derive(Debug, Serialize, Deserialize, Clone, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    pub due_date: Option<DateTime<Utc>>,
    /// Owning user.
    pub user_id: Uuid,
    pub category_id: Option<i64>,
    pub completed_at: Option<DateTime<Utc>>,
    pub reminder: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_defaults_to_pending() {
        let user_id = Uuid::new_v4();
        let task: Task = serde_json::from_value(serde_json::json!({
            "id": 7,
            "title": "Write report",
            "user_id": user_id,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(task.user_id, user_id);
        assert_eq!(task.status, DEFAULT_TASK_STATUS);
        assert!(task.description.is_none());
        assert!(!task.is_completed());
    }
}
