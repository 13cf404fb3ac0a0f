use crate::model::id::{LotId, ReservationId, UserId};
use chrono::{DateTime, Utc};
use derive_new::new;

#[derive(new)]
pub struct CreateReservation {
    pub lot_id: LotId,
    pub user_id: UserId,
    pub vehicle_number: String,
    pub parking_timestamp: DateTime<Utc>,
}

#[derive(new)]
pub struct ReleaseReservation {
    pub reservation_id: ReservationId,
    pub requested_user: UserId,
    pub leaving_timestamp: DateTime<Utc>,
}
