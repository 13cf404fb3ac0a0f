use chrono::{DateTime, Utc};
use strum::{AsRefStr, EnumString};

use crate::model::id::{LotId, ReservationId, SpotId, UserId};

// DB には 1 文字のコードで保存する
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
pub enum SpotStatus {
    #[strum(serialize = "A")]
    Available,
    #[strum(serialize = "O")]
    Occupied,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParkingSpot {
    pub spot_id: SpotId,
    pub lot_id: LotId,
    pub spot_number: i64,
    pub status: SpotStatus,
}

impl ParkingSpot {
    pub fn is_available(&self) -> bool {
        self.status == SpotStatus::Available
    }
}

#[derive(Debug)]
pub struct SpotOccupant {
    pub reservation_id: ReservationId,
    pub user_id: UserId,
    pub full_name: String,
    pub vehicle_number: String,
    pub parking_timestamp: DateTime<Utc>,
}

#[derive(Debug)]
pub struct SpotDetail {
    pub spot: ParkingSpot,
    pub occupant: Option<SpotOccupant>,
}
