use crate::model::{id::UserId, role::Role};

pub mod event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub email: String,
    pub full_name: String,
    pub address: String,
    pub pin_code: String,
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// 管理画面のユーザー一覧用
#[derive(Debug)]
pub struct UserOverview {
    pub user: User,
    pub has_open_reservation: bool,
    pub reservation_count: i64,
}
