pub mod health;
pub mod users;

use crate::error::AppError;
use actix_web::web;

/// JSON extractor settings: unparsable bodies become `AppError::BadRequest`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid request body: {}", err)).into()
    })
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(health::health).service(
        web::scope("/users")
            .service(users::create_user)
            .service(users::get_user_by_email)
            .service(users::get_user_by_id)
            .service(users::get_all_users)
            .service(users::update_user_by_email)
            .service(users::update_user_by_id)
            .service(users::delete_user_by_email)
            .service(users::delete_user_by_id),
    );
}
