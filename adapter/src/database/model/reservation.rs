use kernel::model::{
    id::{LotId, ReservationId, SpotId, UserId},
    reservation::{Reservation, ReservationSpot},
};
use sqlx::types::chrono::{DateTime, Utc};

// 予約と、区画・駐車場の情報を INNER JOIN して取得する際に使う型
// 駐車中の予約では leaving_timestamp と total_cost が None になる
#[derive(sqlx::FromRow)]
pub struct ReservationRow {
    pub id: ReservationId,
    pub user_id: UserId,
    pub vehicle_number: String,
    pub parking_timestamp: DateTime<Utc>,
    pub leaving_timestamp: Option<DateTime<Utc>>,
    pub total_cost: Option<f64>,
    pub spot_id: SpotId,
    pub spot_number: i64,
    pub lot_id: LotId,
    pub prime_location_name: String,
    pub price_per_hour: f64,
}

impl From<ReservationRow> for Reservation {
    fn from(value: ReservationRow) -> Self {
        let ReservationRow {
            id,
            user_id,
            vehicle_number,
            parking_timestamp,
            leaving_timestamp,
            total_cost,
            spot_id,
            spot_number,
            lot_id,
            prime_location_name,
            price_per_hour,
        } = value;
        Reservation {
            reservation_id: id,
            user_id,
            vehicle_number,
            parking_timestamp,
            leaving_timestamp,
            total_cost,
            spot: ReservationSpot {
                spot_id,
                spot_number,
                lot_id,
                prime_location_name,
                price_per_hour,
            },
        }
    }
}
