use crate::{
    auth::{AuthMiddleware, AuthenticatedUserId, LoginRequest, RegisterRequest},
    error::AppError,
    services::AccountService,
};
use actix_web::{get, post, web, HttpResponse, Responder};

/// Register a new user
///
/// Creates the account and returns the public profile together with a token.
///
/// ## Responses:
/// - `201 Created`: `{message, token, user}`.
/// - `400 Bad Request`: missing field, bad format, or email already registered.
#[post("/register")]
pub async fn register(
    accounts: web::Data<AccountService>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let registered = accounts.register(register_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(registered))
}

/// Login user
///
/// ## Responses:
/// - `200 OK`: `{token, user}`.
/// - `400 Bad Request`: unknown email or wrong password.
#[post("/login")]
pub async fn login(
    accounts: web::Data<AccountService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let response = accounts.login(login_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Profile of the authenticated user, without the password hash.
#[get("/perfil", wrap = "AuthMiddleware")]
pub async fn profile(
    accounts: web::Data<AccountService>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let profile = accounts.profile(user_id.0).await?;
    Ok(HttpResponse::Ok().json(profile))
}
