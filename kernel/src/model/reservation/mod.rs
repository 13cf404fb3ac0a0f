use crate::model::id::{LotId, ReservationId, SpotId, UserId};
use chrono::{DateTime, Utc};

pub mod event;

#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub reservation_id: ReservationId,
    pub user_id: UserId,
    pub vehicle_number: String,
    pub parking_timestamp: DateTime<Utc>,
    pub leaving_timestamp: Option<DateTime<Utc>>,
    pub total_cost: Option<f64>,
    pub spot: ReservationSpot,
}

impl Reservation {
    // leaving_timestamp が入っていなければ駐車中
    pub fn is_open(&self) -> bool {
        self.leaving_timestamp.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReservationSpot {
    pub spot_id: SpotId,
    pub spot_number: i64,
    pub lot_id: LotId,
    pub prime_location_name: String,
    pub price_per_hour: f64,
}

// 料金は経過時間に比例し、小数点以下 2 桁で丸める。逆転した区間は 0
pub fn compute_cost(
    parking_timestamp: DateTime<Utc>,
    leaving_timestamp: DateTime<Utc>,
    price_per_hour: f64,
) -> f64 {
    let seconds = (leaving_timestamp - parking_timestamp).num_seconds().max(0);
    let hours = seconds as f64 / 3600.0;
    (hours * price_per_hour * 100.0).round() / 100.0
}
