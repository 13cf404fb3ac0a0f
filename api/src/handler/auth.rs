use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use garde::Validate;
use kernel::model::auth::{event::CreateToken, AccessToken, SessionKind};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::model::{
    auth::{LoginRequest, LoginResponse, MessageResponse},
    user::{CreateUserRequest, UserResponse},
};

pub async fn index() -> &'static str {
    "Welcome to the Vehicle Parking App!"
}

pub async fn user_register(
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    req.validate(&())?;

    let user = registry.user_repository().create(req.into()).await?;
    tracing::info!(user_id = %user.user_id, "user registered");

    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn user_login(
    State(registry): State<AppRegistry>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    login(registry, jar, req, SessionKind::User).await
}

pub async fn admin_login(
    State(registry): State<AppRegistry>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    login(registry, jar, req, SessionKind::Admin).await
}

async fn login(
    registry: AppRegistry,
    jar: CookieJar,
    req: LoginRequest,
    kind: SessionKind,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    req.validate(&())?;

    let user_id = registry
        .auth_repository()
        .verify_user(req.email.trim(), &req.password)
        .await?;
    let user = registry
        .user_repository()
        .find_current_user(user_id)
        .await?
        .ok_or(AppError::UnauthenticatedError)?;

    // ユーザー用の画面から管理者は、管理者用の画面からユーザーはログインできない
    if user.role != kind.role() {
        return Err(AppError::UnauthenticatedError);
    }

    let access_token = registry
        .auth_repository()
        .create_token(CreateToken::new(user_id))
        .await?;

    let cookie = Cookie::build((kind.cookie_name(), access_token.0))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            message: format!("Welcome, {}!", user.full_name),
            full_name: user.full_name,
            role: user.role.into(),
        }),
    ))
}

pub async fn logout(
    State(registry): State<AppRegistry>,
    mut jar: CookieJar,
) -> AppResult<(CookieJar, Json<MessageResponse>)> {
    for kind in [SessionKind::User, SessionKind::Admin] {
        let name = kind.cookie_name();
        if let Some(token) = jar.get(name).map(|c| AccessToken(c.value().to_string())) {
            registry.auth_repository().delete_token(token).await?;
            jar = jar.remove(Cookie::build(name).path("/"));
        }
    }

    Ok((jar, Json(MessageResponse::new("You have been logged out."))))
}
