use axum::{
    extract::{Query, State},
    Json,
};
use kernel::model::role::Role;
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::{AuthorizedAdmin, AuthorizedUser},
    model::{
        dashboard::UserDashboardResponse,
        lot::{LotListQuery, LotResponse},
        reservation::{ReservationResponse, ReservationsResponse},
        summary::UserSummaryResponse,
        user::UsersResponse,
    },
};

pub async fn user_dashboard(
    user: AuthorizedUser,
    Query(query): Query<LotListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<UserDashboardResponse>> {
    let lots = registry.lot_repository().find_all(query.q).await?;
    let active_reservation = registry
        .reservation_repository()
        .find_open_by_user_id(user.id())
        .await?;

    Ok(Json(UserDashboardResponse {
        user: user.user.into(),
        active_reservation: active_reservation.map(ReservationResponse::from),
        lots: lots.into_iter().map(LotResponse::from).collect(),
    }))
}

pub async fn user_history(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationsResponse>> {
    registry
        .reservation_repository()
        .find_history_by_user_id(user.id())
        .await
        .map(ReservationsResponse::from)
        .map(Json)
}

pub async fn user_summary(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<UserSummaryResponse>> {
    registry
        .summary_repository()
        .user_summary(user.id())
        .await
        .map(UserSummaryResponse::from)
        .map(Json)
}

pub async fn admin_users(
    _admin: AuthorizedAdmin,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<UsersResponse>> {
    registry
        .user_repository()
        .find_all_by_role(Role::User)
        .await
        .map(UsersResponse::from)
        .map(Json)
}
