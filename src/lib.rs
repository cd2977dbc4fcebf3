#![doc = "The `rollcall` library crate."]
#![doc = ""]
#![doc = "Domain models, validation rules, the user store and its backends, routing"]
#![doc = "configuration and error handling for the Rollcall user service."]
#![doc = "The binary (`main.rs`) only loads configuration and starts the server."]

pub mod config;
pub mod context;
pub mod error;
pub mod models;
pub mod password;
pub mod routes;
pub mod store;
pub mod validation;

pub use context::AppContext;
pub use error::AppError;
