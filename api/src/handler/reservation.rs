use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{
    id::{LotId, ReservationId},
    reservation::event::{CreateReservation, ReleaseReservation},
};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedUser,
    model::reservation::{BookSpotRequest, ReservationResponse},
};

pub async fn book_parking_spot(
    user: AuthorizedUser,
    Path(lot_id): Path<LotId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<BookSpotRequest>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    req.validate(&())?;

    let create_reservation = CreateReservation::new(
        lot_id,
        user.id(),
        req.vehicle_number.trim().to_string(),
        chrono::Utc::now(),
    );

    registry
        .reservation_repository()
        .create(create_reservation)
        .await
        .map(|r| (StatusCode::CREATED, Json(r.into())))
}

pub async fn release_parking_spot(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationResponse>> {
    let release = ReleaseReservation::new(reservation_id, user.id(), chrono::Utc::now());

    registry
        .reservation_repository()
        .release(release)
        .await
        .map(ReservationResponse::from)
        .map(Json)
}
