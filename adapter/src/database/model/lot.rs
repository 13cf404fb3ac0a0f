use std::str::FromStr;

use kernel::model::{
    id::{LotId, ReservationId, SpotId, UserId},
    lot::ParkingLot,
    spot::{ParkingSpot, SpotDetail, SpotOccupant, SpotStatus},
};
use shared::error::AppError;
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct LotRow {
    pub id: LotId,
    pub prime_location_name: String,
    pub price_per_hour: f64,
    pub address: String,
    pub pin_code: String,
    pub maximum_number_of_spots: i64,
    pub available_spots: i64,
    pub occupied_spots: i64,
}

impl From<LotRow> for ParkingLot {
    fn from(value: LotRow) -> Self {
        let LotRow {
            id,
            prime_location_name,
            price_per_hour,
            address,
            pin_code,
            maximum_number_of_spots,
            available_spots,
            occupied_spots,
        } = value;
        ParkingLot {
            lot_id: id,
            prime_location_name,
            price_per_hour,
            address,
            pin_code,
            maximum_number_of_spots,
            available_spots,
            occupied_spots,
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct SpotRow {
    pub id: SpotId,
    pub lot_id: LotId,
    pub spot_number: i64,
    pub status: String,
}

impl TryFrom<SpotRow> for ParkingSpot {
    type Error = AppError;

    fn try_from(value: SpotRow) -> Result<Self, Self::Error> {
        let SpotRow {
            id,
            lot_id,
            spot_number,
            status,
        } = value;
        Ok(ParkingSpot {
            spot_id: id,
            lot_id,
            spot_number,
            status: SpotStatus::from_str(&status).map_err(|e| {
                AppError::ConversionEntityError(format!("spot status {status}: {e}"))
            })?,
        })
    }
}

// 区画と、駐車中であればその予約者を LEFT JOIN で取得する際に使う型
// 空き区画では reservation_id 以下がすべて None になる
#[derive(sqlx::FromRow)]
pub struct SpotDetailRow {
    #[sqlx(flatten)]
    pub spot: SpotRow,
    pub reservation_id: Option<ReservationId>,
    pub user_id: Option<UserId>,
    pub full_name: Option<String>,
    pub vehicle_number: Option<String>,
    pub parking_timestamp: Option<DateTime<Utc>>,
}

impl TryFrom<SpotDetailRow> for SpotDetail {
    type Error = AppError;

    fn try_from(value: SpotDetailRow) -> Result<Self, Self::Error> {
        let SpotDetailRow {
            spot,
            reservation_id,
            user_id,
            full_name,
            vehicle_number,
            parking_timestamp,
        } = value;
        let occupant = match (
            reservation_id,
            user_id,
            full_name,
            vehicle_number,
            parking_timestamp,
        ) {
            (
                Some(reservation_id),
                Some(user_id),
                Some(full_name),
                Some(vehicle_number),
                Some(parking_timestamp),
            ) => Some(SpotOccupant {
                reservation_id,
                user_id,
                full_name,
                vehicle_number,
                parking_timestamp,
            }),
            _ => None,
        };
        Ok(SpotDetail {
            spot: spot.try_into()?,
            occupant,
        })
    }
}
