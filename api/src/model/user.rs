use garde::Validate;
use kernel::model::{
    id::UserId,
    role::Role,
    user::{event::CreateUser, User, UserOverview},
};
use serde::{Deserialize, Serialize};

use super::not_blank;

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoleName {
    Admin,
    User,
}

impl From<Role> for RoleName {
    fn from(value: Role) -> Self {
        match value {
            Role::Admin => Self::Admin,
            Role::User => Self::User,
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[garde(email)]
    email: String,
    #[garde(length(min = 1))]
    password: String,
    #[garde(custom(not_blank))]
    full_name: String,
    #[garde(custom(not_blank))]
    address: String,
    #[garde(custom(not_blank))]
    pin_code: String,
}

// 登録画面から作られるのは常に一般ユーザー
impl From<CreateUserRequest> for CreateUser {
    fn from(value: CreateUserRequest) -> Self {
        let CreateUserRequest {
            email,
            password,
            full_name,
            address,
            pin_code,
        } = value;
        Self {
            email: email.trim().to_string(),
            password,
            full_name: full_name.trim().to_string(),
            address: address.trim().to_string(),
            pin_code: pin_code.trim().to_string(),
            role: Role::User,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: UserId,
    pub email: String,
    pub full_name: String,
    pub address: String,
    pub pin_code: String,
    pub role: RoleName,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        let User {
            user_id,
            email,
            full_name,
            address,
            pin_code,
            role,
        } = value;
        Self {
            user_id,
            email,
            full_name,
            address,
            pin_code,
            role: RoleName::from(role),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOverviewResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub has_open_reservation: bool,
    pub reservation_count: i64,
}

impl From<UserOverview> for UserOverviewResponse {
    fn from(value: UserOverview) -> Self {
        let UserOverview {
            user,
            has_open_reservation,
            reservation_count,
        } = value;
        Self {
            user: user.into(),
            has_open_reservation,
            reservation_count,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersResponse {
    pub items: Vec<UserOverviewResponse>,
}

impl From<Vec<UserOverview>> for UsersResponse {
    fn from(value: Vec<UserOverview>) -> Self {
        Self {
            items: value.into_iter().map(UserOverviewResponse::from).collect(),
        }
    }
}
