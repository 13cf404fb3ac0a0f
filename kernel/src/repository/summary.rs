use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::UserId,
    summary::{AdminSummary, UserSummary},
};

#[async_trait]
pub trait SummaryRepository: Send + Sync {
    async fn admin_summary(&self) -> AppResult<AdminSummary>;
    async fn user_summary(&self, user_id: UserId) -> AppResult<UserSummary>;
}
