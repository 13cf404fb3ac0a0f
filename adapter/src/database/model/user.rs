use kernel::model::{
    id::UserId,
    role::Role,
    user::{User, UserOverview},
};
use shared::error::AppError;
use std::str::FromStr;

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub id: UserId,
    pub email_id: String,
    pub full_name: String,
    pub address: String,
    pub pin_code: String,
    pub role: String,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(value: UserRow) -> Result<Self, Self::Error> {
        let UserRow {
            id,
            email_id,
            full_name,
            address,
            pin_code,
            role,
        } = value;
        Ok(User {
            user_id: id,
            email: email_id,
            full_name,
            address,
            pin_code,
            role: Role::from_str(&role)
                .map_err(|e| AppError::ConversionEntityError(format!("role {role}: {e}")))?,
        })
    }
}

// 管理画面のユーザー一覧で使う型
#[derive(sqlx::FromRow)]
pub struct UserOverviewRow {
    #[sqlx(flatten)]
    pub user: UserRow,
    pub open_reservations: i64,
    pub reservation_count: i64,
}

impl TryFrom<UserOverviewRow> for UserOverview {
    type Error = AppError;

    fn try_from(value: UserOverviewRow) -> Result<Self, Self::Error> {
        Ok(UserOverview {
            user: value.user.try_into()?,
            has_open_reservation: value.open_reservations > 0,
            reservation_count: value.reservation_count,
        })
    }
}

// ログイン時の照合に使う型
#[derive(sqlx::FromRow)]
pub struct UserCredentialRow {
    pub id: UserId,
    pub password_hash: String,
}
