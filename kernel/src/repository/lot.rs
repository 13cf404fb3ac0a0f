use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::LotId,
    lot::{
        event::{CreateLot, DeleteLot, DeleteSpot, UpdateLot},
        LotDetail, ParkingLot,
    },
};

#[async_trait]
pub trait LotRepository: Send + Sync {
    // 駐車場と 1..=capacity の区画を作成する
    async fn create(&self, event: CreateLot) -> AppResult<LotId>;
    // 名前・住所・郵便番号で部分一致検索する（None なら全件）
    async fn find_all(&self, keyword: Option<String>) -> AppResult<Vec<ParkingLot>>;
    async fn find_by_id(&self, lot_id: LotId) -> AppResult<Option<ParkingLot>>;
    async fn find_detail_by_id(&self, lot_id: LotId) -> AppResult<Option<LotDetail>>;
    async fn find_all_details(&self) -> AppResult<Vec<LotDetail>>;
    // 属性の更新と区画数の変更を行う
    async fn update(&self, event: UpdateLot) -> AppResult<()>;
    async fn delete(&self, event: DeleteLot) -> AppResult<()>;
    async fn delete_spot(&self, event: DeleteSpot) -> AppResult<()>;
}
