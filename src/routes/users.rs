use crate::{
    context::AppContext,
    error::AppError,
    models::{CreateUserRequest, NewUser, UpdateUserRequest, User},
    password::hash_password_blocking,
    validation::UserCandidate,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;

/// Identifiers that are not UUIDs cannot match any user.
fn parse_user_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::user_not_found())
}

/// Fails with `Conflict` when a live user other than `except` holds `email`.
async fn ensure_email_free(
    ctx: &AppContext,
    email: &str,
    except: Option<Uuid>,
) -> Result<(), AppError> {
    match ctx.store.find_user_by_email(email).await {
        Ok(holder) if Some(holder.id) != except => Err(AppError::email_taken()),
        Ok(_) | Err(AppError::NotFound(_)) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Applies `changes` to `user`, re-validates the merged record and saves it.
///
/// Nothing is written unless the merged record passes every rule.
async fn apply_update(
    ctx: &AppContext,
    mut user: User,
    changes: UpdateUserRequest,
) -> Result<User, AppError> {
    let previous_email = user.email.clone();
    user.apply(&changes);
    UserCandidate::for_update(&user, &changes).check()?;

    if user.email != previous_email {
        ensure_email_free(ctx, &user.email, Some(user.id)).await?;
    }

    if let Some(password) = changes.password {
        user.password_hash = hash_password_blocking(password).await?;
    }

    let saved = ctx.store.save_user(&user).await?;
    log::info!("updated user {}", saved.id);
    Ok(saved)
}

async fn soft_delete(ctx: &AppContext, user: User) -> Result<HttpResponse, AppError> {
    ctx.store.delete_user(user.id).await?;
    log::info!("deleted user {}", user.id);
    Ok(HttpResponse::Ok().json(json!({ "message": "User deleted" })))
}

/// Creates a new user.
///
/// ## Request Body:
/// `name`, `email`, `password` and `age`, all required.
///
/// ## Responses:
/// - `201 Created`: the new user, without its password.
/// - `400 Bad Request`: unparsable body or a broken field rule.
/// - `409 Conflict`: another live user already holds the email.
/// - `500 Internal Server Error`: storage or hashing failure.
#[post("/create")]
pub async fn create_user(
    ctx: web::Data<AppContext>,
    body: web::Json<CreateUserRequest>,
) -> Result<impl Responder, AppError> {
    let request = body.into_inner();
    UserCandidate::for_create(&request).check()?;

    // Fast path only; the store's unique index settles races.
    ensure_email_free(&ctx, &request.email, None).await?;

    let password_hash = hash_password_blocking(request.password).await?;
    let user = ctx
        .store
        .create_user(NewUser::new(
            request.name,
            request.email,
            password_hash,
            request.age,
        ))
        .await?;

    log::info!("created user {} (member #{})", user.id, user.member_number);
    Ok(HttpResponse::Created().json(user))
}

/// Retrieves a live user by email.
///
/// ## Responses:
/// - `200 OK`: the user.
/// - `404 Not Found`: no live user has this email.
#[get("/get/email/{email}")]
pub async fn get_user_by_email(
    ctx: web::Data<AppContext>,
    email: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let user = ctx.store.find_user_by_email(&email).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Retrieves a live user by id.
///
/// ## Responses:
/// - `200 OK`: the user.
/// - `404 Not Found`: no live user has this id, or the id is not a UUID.
#[get("/get/id/{id}")]
pub async fn get_user_by_id(
    ctx: web::Data<AppContext>,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let user = ctx.store.find_user_by_id(parse_user_id(&id)?).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Lists every live user, ordered by member number.
#[get("/get/all/")]
pub async fn get_all_users(ctx: web::Data<AppContext>) -> Result<impl Responder, AppError> {
    let users = ctx.store.list_all_users().await?;
    Ok(HttpResponse::Ok().json(users))
}

/// Updates the user currently holding `email`.
///
/// Fields absent from the body keep their stored values. The merged record is
/// validated with the same rules as on create.
///
/// ## Responses:
/// - `200 OK`: the updated user.
/// - `400 Bad Request`: unparsable body or the merged record breaks a rule.
/// - `404 Not Found`: no live user has this email.
/// - `409 Conflict`: the new email belongs to another live user.
#[put("/update/email/{email}")]
pub async fn update_user_by_email(
    ctx: web::Data<AppContext>,
    email: web::Path<String>,
    body: web::Json<UpdateUserRequest>,
) -> Result<impl Responder, AppError> {
    let user = ctx.store.find_user_by_email(&email).await?;
    let updated = apply_update(&ctx, user, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Updates the user with `id`. Same rules and responses as the by-email route.
#[put("/update/id/{id}")]
pub async fn update_user_by_id(
    ctx: web::Data<AppContext>,
    id: web::Path<String>,
    body: web::Json<UpdateUserRequest>,
) -> Result<impl Responder, AppError> {
    let user = ctx.store.find_user_by_id(parse_user_id(&id)?).await?;
    let updated = apply_update(&ctx, user, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Soft-deletes the user holding `email`.
///
/// ## Responses:
/// - `200 OK`: `{"message": "User deleted"}`.
/// - `404 Not Found`: no live user has this email (including one already deleted).
#[delete("/delete/email/{email}")]
pub async fn delete_user_by_email(
    ctx: web::Data<AppContext>,
    email: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let user = ctx.store.find_user_by_email(&email).await?;
    soft_delete(&ctx, user).await
}

#[delete("/delete/id/{id}")]
pub async fn delete_user_by_id(
    ctx: web::Data<AppContext>,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let user = ctx.store.find_user_by_id(parse_user_id(&id)?).await?;
    soft_delete(&ctx, user).await
}
