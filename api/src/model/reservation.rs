use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    id::{LotId, ReservationId, SpotId},
    reservation::{Reservation, ReservationSpot},
};
use serde::{Deserialize, Serialize};

use super::not_blank;

const MAX_VEHICLE_NUMBER_CHARS: usize = 20;

// 前後の空白を除いた文字数で判定する
fn vehicle_number<T: AsRef<str> + ?Sized>(value: &T, ctx: &()) -> garde::Result {
    not_blank(value, ctx)?;
    if value.as_ref().trim().chars().count() > MAX_VEHICLE_NUMBER_CHARS {
        return Err(garde::Error::new(format!(
            "must be at most {MAX_VEHICLE_NUMBER_CHARS} characters"
        )));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookSpotRequest {
    #[garde(custom(self::vehicle_number))]
    pub vehicle_number: String,
}

#[derive(Debug, Serialize)]
pub enum ReservationStatus {
    Parked,
    Released,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub reservation_id: ReservationId,
    pub vehicle_number: String,
    pub status: ReservationStatus,
    pub parking_timestamp: DateTime<Utc>,
    pub leaving_timestamp: Option<DateTime<Utc>>,
    pub total_cost: Option<f64>,
    pub spot: ReservationSpotResponse,
}

impl From<Reservation> for ReservationResponse {
    fn from(value: Reservation) -> Self {
        let status = if value.is_open() {
            ReservationStatus::Parked
        } else {
            ReservationStatus::Released
        };
        let Reservation {
            reservation_id,
            user_id: _,
            vehicle_number,
            parking_timestamp,
            leaving_timestamp,
            total_cost,
            spot,
        } = value;
        Self {
            reservation_id,
            vehicle_number,
            status,
            parking_timestamp,
            leaving_timestamp,
            total_cost,
            spot: spot.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationSpotResponse {
    pub spot_id: SpotId,
    pub spot_number: i64,
    pub lot_id: LotId,
    pub prime_location_name: String,
    pub price_per_hour: f64,
}

impl From<ReservationSpot> for ReservationSpotResponse {
    fn from(value: ReservationSpot) -> Self {
        let ReservationSpot {
            spot_id,
            spot_number,
            lot_id,
            prime_location_name,
            price_per_hour,
        } = value;
        Self {
            spot_id,
            spot_number,
            lot_id,
            prime_location_name,
            price_per_hour,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationsResponse {
    pub items: Vec<ReservationResponse>,
}

impl From<Vec<Reservation>> for ReservationsResponse {
    fn from(value: Vec<Reservation>) -> Self {
        Self {
            items: value.into_iter().map(ReservationResponse::from).collect(),
        }
    }
}
