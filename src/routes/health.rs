use crate::context::AppContext;
use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

/// Health check endpoint
///
/// Returns 200 when the user store answers, 503 otherwise.
#[get("/health")]
pub async fn health(ctx: web::Data<AppContext>) -> impl Responder {
    match ctx.store.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "timestamp": Utc::now()
        })),
        Err(e) => {
            log::warn!("health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unavailable",
                "timestamp": Utc::now()
            }))
        }
    }
}
