pub mod task;
pub mod user;

pub use task::{Task, DEFAULT_TASK_STATUS};
pub use user::{CreateUserRequest, NewUser, UpdateUserRequest, User};
