use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    id::{LotId, ReservationId, SpotId, UserId},
    lot::{
        event::{CreateLot, UpdateLot},
        LotDetail, ParkingLot,
    },
    spot::{SpotDetail, SpotOccupant, SpotStatus},
};
use serde::{Deserialize, Serialize};

use super::not_blank;

fn positive_price(value: &f64, _ctx: &()) -> garde::Result {
    if !value.is_finite() || *value <= 0.0 {
        return Err(garde::Error::new("price per hour must be greater than 0"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLotRequest {
    #[garde(custom(not_blank))]
    pub prime_location_name: String,
    #[garde(custom(positive_price))]
    pub price_per_hour: f64,
    #[garde(custom(not_blank))]
    pub address: String,
    #[garde(custom(not_blank))]
    pub pin_code: String,
    #[garde(range(min = 1, max = 1000))]
    pub maximum_number_of_spots: i64,
}

impl From<CreateLotRequest> for CreateLot {
    fn from(value: CreateLotRequest) -> Self {
        let CreateLotRequest {
            prime_location_name,
            price_per_hour,
            address,
            pin_code,
            maximum_number_of_spots,
        } = value;
        CreateLot {
            prime_location_name: prime_location_name.trim().to_string(),
            price_per_hour,
            address: address.trim().to_string(),
            pin_code: pin_code.trim().to_string(),
            maximum_number_of_spots,
        }
    }
}

// 編集画面では全項目を送り直す
pub type UpdateLotRequest = CreateLotRequest;

pub struct UpdateLotRequestWithId(pub LotId, pub UpdateLotRequest);

impl From<UpdateLotRequestWithId> for UpdateLot {
    fn from(value: UpdateLotRequestWithId) -> Self {
        let UpdateLotRequestWithId(lot_id, req) = value;
        let CreateLot {
            prime_location_name,
            price_per_hour,
            address,
            pin_code,
            maximum_number_of_spots,
        } = req.into();
        UpdateLot {
            lot_id,
            prime_location_name,
            price_per_hour,
            address,
            pin_code,
            maximum_number_of_spots,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LotListQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LotResponse {
    pub lot_id: LotId,
    pub prime_location_name: String,
    pub price_per_hour: f64,
    pub address: String,
    pub pin_code: String,
    pub maximum_number_of_spots: i64,
    pub available_spots: i64,
    pub occupied_spots: i64,
}

impl From<ParkingLot> for LotResponse {
    fn from(value: ParkingLot) -> Self {
        let ParkingLot {
            lot_id,
            prime_location_name,
            price_per_hour,
            address,
            pin_code,
            maximum_number_of_spots,
            available_spots,
            occupied_spots,
        } = value;
        Self {
            lot_id,
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

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LotsResponse {
    pub items: Vec<LotResponse>,
}

impl From<Vec<ParkingLot>> for LotsResponse {
    fn from(value: Vec<ParkingLot>) -> Self {
        Self {
            items: value.into_iter().map(LotResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub enum SpotStatusName {
    Available,
    Occupied,
}

impl From<SpotStatus> for SpotStatusName {
    fn from(value: SpotStatus) -> Self {
        match value {
            SpotStatus::Available => Self::Available,
            SpotStatus::Occupied => Self::Occupied,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotOccupantResponse {
    pub reservation_id: ReservationId,
    pub user_id: UserId,
    pub full_name: String,
    pub vehicle_number: String,
    pub parking_timestamp: DateTime<Utc>,
}

impl From<SpotOccupant> for SpotOccupantResponse {
    fn from(value: SpotOccupant) -> Self {
        let SpotOccupant {
            reservation_id,
            user_id,
            full_name,
            vehicle_number,
            parking_timestamp,
        } = value;
        Self {
            reservation_id,
            user_id,
            full_name,
            vehicle_number,
            parking_timestamp,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotResponse {
    pub spot_id: SpotId,
    pub spot_number: i64,
    pub status: SpotStatusName,
    pub occupant: Option<SpotOccupantResponse>,
}

impl From<SpotDetail> for SpotResponse {
    fn from(value: SpotDetail) -> Self {
        let SpotDetail { spot, occupant } = value;
        Self {
            spot_id: spot.spot_id,
            spot_number: spot.spot_number,
            status: spot.status.into(),
            occupant: occupant.map(SpotOccupantResponse::from),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LotDetailResponse {
    #[serde(flatten)]
    pub lot: LotResponse,
    pub spots: Vec<SpotResponse>,
}

impl From<LotDetail> for LotDetailResponse {
    fn from(value: LotDetail) -> Self {
        let LotDetail { lot, spots } = value;
        Self {
            lot: lot.into(),
            spots: spots.into_iter().map(SpotResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LotCreatedResponse {
    pub lot_id: LotId,
}
