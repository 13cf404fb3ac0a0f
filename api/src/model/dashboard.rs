use serde::Serialize;

use super::{
    lot::{LotDetailResponse, LotResponse},
    reservation::ReservationResponse,
    user::UserResponse,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDashboardResponse {
    pub user: UserResponse,
    pub active_reservation: Option<ReservationResponse>,
    pub lots: Vec<LotResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboardResponse {
    pub admin: UserResponse,
    pub lots: Vec<LotDetailResponse>,
}
