use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;
use kernel::model::{
    auth::{AccessToken, SessionKind},
    id::UserId,
    user::User,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

// ログイン中の一般ユーザー（user_session クッキー）
pub struct AuthorizedUser {
    pub access_token: AccessToken,
    pub user: User,
}

impl AuthorizedUser {
    pub fn id(&self) -> UserId {
        self.user.user_id
    }
}

// ログイン中の管理者（admin_session クッキー）
pub struct AuthorizedAdmin {
    pub access_token: AccessToken,
    pub user: User,
}

impl AuthorizedAdmin {
    pub fn id(&self) -> UserId {
        self.user.user_id
    }
}

async fn authorize(
    parts: &Parts,
    registry: &AppRegistry,
    kind: SessionKind,
) -> AppResult<(AccessToken, User)> {
    let jar = CookieJar::from_headers(&parts.headers);
    let access_token = jar
        .get(kind.cookie_name())
        .map(|c| AccessToken(c.value().to_string()))
        .ok_or(AppError::UnauthorizedError)?;

    let user_id = registry
        .auth_repository()
        .fetch_user_id_from_token(&access_token)
        .await?
        .ok_or(AppError::UnauthorizedError)?;

    let user = registry
        .user_repository()
        .find_current_user(user_id)
        .await?
        .ok_or(AppError::UnauthorizedError)?;

    if user.role != kind.role() {
        return Err(AppError::ForbiddenOperation(
            "You are not allowed to access this page.".into(),
        ));
    }

    Ok((access_token, user))
}

#[async_trait]
impl FromRequestParts<AppRegistry> for AuthorizedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        registry: &AppRegistry,
    ) -> Result<Self, Self::Rejection> {
        let (access_token, user) = authorize(parts, registry, SessionKind::User).await?;
        Ok(Self { access_token, user })
    }
}

#[async_trait]
impl FromRequestParts<AppRegistry> for AuthorizedAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        registry: &AppRegistry,
    ) -> Result<Self, Self::Rejection> {
        let (access_token, user) = authorize(parts, registry, SessionKind::Admin).await?;
        Ok(Self { access_token, user })
    }
}
