use crate::model::role::Role;

pub mod event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(pub String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ログイン画面ごとに別のセッションキーを使う
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    User,
    Admin,
}

impl SessionKind {
    pub fn cookie_name(&self) -> &'static str {
        match self {
            SessionKind::User => "user_session",
            SessionKind::Admin => "admin_session",
        }
    }

    pub fn role(&self) -> Role {
        match self {
            SessionKind::User => Role::User,
            SessionKind::Admin => Role::Admin,
        }
    }
}
