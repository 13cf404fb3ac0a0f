use crate::model::id::{LotId, SpotId};

pub struct CreateLot {
    pub prime_location_name: String,
    pub price_per_hour: f64,
    pub address: String,
    pub pin_code: String,
    pub maximum_number_of_spots: i64,
}

#[derive(Debug)]
pub struct UpdateLot {
    pub lot_id: LotId,
    pub prime_location_name: String,
    pub price_per_hour: f64,
    pub address: String,
    pub pin_code: String,
    pub maximum_number_of_spots: i64,
}

#[derive(Debug)]
pub struct DeleteLot {
    pub lot_id: LotId,
}

#[derive(Debug)]
pub struct DeleteSpot {
    pub spot_id: SpotId,
}
