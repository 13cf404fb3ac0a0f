use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::UserId,
    role::Role,
    user::{event::CreateUser, User, UserOverview},
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, event: CreateUser) -> AppResult<User>;
    async fn find_current_user(&self, user_id: UserId) -> AppResult<Option<User>>;
    // 指定ロールのユーザーと予約状況の一覧を取得する
    async fn find_all_by_role(&self, role: Role) -> AppResult<Vec<UserOverview>>;
    async fn exists_with_role(&self, role: Role) -> AppResult<bool>;
}
