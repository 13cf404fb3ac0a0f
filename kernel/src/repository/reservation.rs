use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::{ReservationId, UserId},
    reservation::{
        event::{CreateReservation, ReleaseReservation},
        Reservation,
    },
};

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    // 空き区画のうち番号が最小のものを予約する
    async fn create(&self, event: CreateReservation) -> AppResult<Reservation>;
    // 出庫処理を行い、料金を確定する
    async fn release(&self, event: ReleaseReservation) -> AppResult<Reservation>;
    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>>;
    // ユーザー ID に紐づく駐車中の予約を取得する
    async fn find_open_by_user_id(&self, user_id: UserId) -> AppResult<Option<Reservation>>;
    // ユーザーの予約履歴を新しい順に取得する
    async fn find_history_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Reservation>>;
}
