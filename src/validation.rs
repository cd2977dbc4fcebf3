//! Field rules for user payloads.
//!
//! Create and both update routes validate the same `UserCandidate`: on create it
//! is the request body, on update it is the stored user overwritten by the
//! fields present in the body. Any violation rejects the request before the
//! store is touched.

use crate::error::AppError;
use crate::models::{CreateUserRequest, UpdateUserRequest, User};
use validator::Validate;

pub const MIN_AGE: i32 = 18;

/// A user as it would look after the request is applied.
#[derive(Debug, Clone, Validate)]
pub struct UserCandidate {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,

    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    /// Plaintext that is about to be hashed. `None` keeps the stored hash.
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: Option<String>,

    #[validate(range(min = 18, message = "must be at least 18"))]
    pub age: i32,
}

impl UserCandidate {
    pub fn for_create(request: &CreateUserRequest) -> Self {
        Self {
            name: request.name.clone(),
            email: request.email.clone(),
            password: Some(request.password.clone()),
            age: request.age,
        }
    }

    /// Builds the merged candidate from an already-merged user and the update body.
    pub fn for_update(merged: &User, changes: &UpdateUserRequest) -> Self {
        Self {
            name: merged.name.clone(),
            email: merged.email.clone(),
            password: changes.password.clone(),
            age: merged.age,
        }
    }

    /// Runs every rule, folding violations into one `AppError::ValidationError`.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn valid() -> UserCandidate {
        UserCandidate {
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            password: Some("secret1".to_string()),
            age: 25,
        }
    }

    fn message_of(candidate: &UserCandidate) -> String {
        match candidate.check() {
            Err(AppError::ValidationError(msg)) => msg,
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_candidate_passes() {
        assert!(valid().check().is_ok());

        let keep_password = UserCandidate {
            password: None,
            ..valid()
        };
        assert!(keep_password.check().is_ok());
    }

    #[test]
    fn test_name_rules() {
        let empty = UserCandidate {
            name: String::new(),
            ..valid()
        };
        assert_eq!(message_of(&empty), "name: must not be empty");

        // Only the empty string is rejected; whitespace is still a name.
        let blank = UserCandidate {
            name: "   ".to_string(),
            ..valid()
        };
        assert!(blank.check().is_ok());
    }

    #[test]
    fn test_email_rules() {
        for email in ["", "ana", "ana@", "@x.com", "ana x@x.com"] {
            let candidate = UserCandidate {
                email: email.to_string(),
                ..valid()
            };
            assert!(candidate.check().is_err(), "{:?} should be rejected", email);
        }
    }

    #[test]
    fn test_password_rules() {
        let short = UserCandidate {
            password: Some("12345".to_string()),
            ..valid()
        };
        assert_eq!(message_of(&short), "password: must be at least 6 characters");

        let exact = UserCandidate {
            password: Some("123456".to_string()),
            ..valid()
        };
        assert!(exact.check().is_ok());
    }

    #[test]
    fn test_age_rules() {
        let minor = UserCandidate { age: 17, ..valid() };
        assert_eq!(message_of(&minor), "age: must be at least 18");

        let negative = UserCandidate { age: -1, ..valid() };
        assert!(negative.check().is_err());

        let adult = UserCandidate { age: MIN_AGE, ..valid() };
        assert!(adult.check().is_ok());
    }

    #[test]
    fn test_every_violation_is_reported() {
        let candidate = UserCandidate {
            name: String::new(),
            email: "nope".to_string(),
            password: Some("1".to_string()),
            age: 3,
        };
        let msg = message_of(&candidate);
        for field in ["age:", "email:", "name:", "password:"] {
            assert!(msg.contains(field), "{} missing from {}", field, msg);
        }
    }

    #[test]
    fn test_update_candidate_uses_merged_values() {
        let now = Utc::now();
        let mut user = User {
            id: Uuid::new_v4(),
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            password_hash: "hash".to_string(),
            age: 25,
            member_number: 1,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        let changes = UpdateUserRequest {
            name: Some(String::new()),
            ..Default::default()
        };
        user.apply(&changes);

        let candidate = UserCandidate::for_update(&user, &changes);
        assert!(candidate.password.is_none());
        assert_eq!(message_of(&candidate), "name: must not be empty");
    }
}
