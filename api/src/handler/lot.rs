use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{
    id::{LotId, SpotId},
    lot::event::{DeleteLot, DeleteSpot},
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedAdmin,
    model::{
        auth::MessageResponse,
        dashboard::AdminDashboardResponse,
        lot::{
            CreateLotRequest, LotCreatedResponse, LotDetailResponse, LotListQuery, LotsResponse,
            UpdateLotRequest, UpdateLotRequestWithId,
        },
    },
};

pub async fn admin_dashboard(
    admin: AuthorizedAdmin,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<AdminDashboardResponse>> {
    let lots = registry.lot_repository().find_all_details().await?;

    Ok(Json(AdminDashboardResponse {
        admin: admin.user.into(),
        lots: lots.into_iter().map(LotDetailResponse::from).collect(),
    }))
}

pub async fn show_lot_list(
    _admin: AuthorizedAdmin,
    Query(query): Query<LotListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<LotsResponse>> {
    registry
        .lot_repository()
        .find_all(query.q)
        .await
        .map(LotsResponse::from)
        .map(Json)
}

pub async fn register_lot(
    _admin: AuthorizedAdmin,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateLotRequest>,
) -> AppResult<(StatusCode, Json<LotCreatedResponse>)> {
    req.validate(&())?;

    registry
        .lot_repository()
        .create(req.into())
        .await
        .map(|lot_id| (StatusCode::CREATED, Json(LotCreatedResponse { lot_id })))
}

pub async fn show_lot(
    _admin: AuthorizedAdmin,
    Path(lot_id): Path<LotId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<LotDetailResponse>> {
    registry
        .lot_repository()
        .find_detail_by_id(lot_id)
        .await
        .and_then(|lot| match lot {
            Some(lot) => Ok(Json(lot.into())),
            None => Err(AppError::EntityNotFound(format!(
                "Parking lot {lot_id} was not found."
            ))),
        })
}

pub async fn update_lot(
    _admin: AuthorizedAdmin,
    Path(lot_id): Path<LotId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateLotRequest>,
) -> AppResult<Json<MessageResponse>> {
    req.validate(&())?;

    registry
        .lot_repository()
        .update(UpdateLotRequestWithId(lot_id, req).into())
        .await
        .map(|_| Json(MessageResponse::new("Parking lot updated.")))
}

pub async fn delete_lot(
    _admin: AuthorizedAdmin,
    Path(lot_id): Path<LotId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<MessageResponse>> {
    registry
        .lot_repository()
        .delete(DeleteLot { lot_id })
        .await
        .map(|_| Json(MessageResponse::new("Parking lot deleted.")))
}

pub async fn delete_spot(
    _admin: AuthorizedAdmin,
    Path(spot_id): Path<SpotId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<MessageResponse>> {
    registry
        .lot_repository()
        .delete_spot(DeleteSpot { spot_id })
        .await
        .map(|_| Json(MessageResponse::new("Parking spot deleted.")))
}
