use shared::error::{AppError, AppResult};

use crate::model::{
    id::{LotId, SpotId},
    spot::{ParkingSpot, SpotDetail},
};

pub mod event;

#[derive(Debug, Clone, PartialEq)]
pub struct ParkingLot {
    pub lot_id: LotId,
    pub prime_location_name: String,
    pub price_per_hour: f64,
    pub address: String,
    pub pin_code: String,
    pub maximum_number_of_spots: i64,
    pub available_spots: i64,
    pub occupied_spots: i64,
}

#[derive(Debug)]
pub struct LotDetail {
    pub lot: ParkingLot,
    pub spots: Vec<SpotDetail>,
}

// 1 つの駐車場に置ける区画数の上限
pub const MAX_SPOTS_PER_LOT: i64 = 1000;

pub fn check_capacity(capacity: i64) -> AppResult<()> {
    if !(1..=MAX_SPOTS_PER_LOT).contains(&capacity) {
        return Err(AppError::UnprocessableEntity(format!(
            "Capacity must be between 1 and {MAX_SPOTS_PER_LOT}."
        )));
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
pub enum ResizePlan {
    Unchanged,
    // 追加する区画番号（昇順）
    Grow(Vec<i64>),
    // 削除する空き区画（番号の大きい順）
    Shrink(Vec<SpotId>),
}

// 増やすときは現在の最大番号の次から採番し、
// 減らすときは空き区画だけを番号の大きい順に削除する
pub fn plan_resize(spots: &[ParkingSpot], new_capacity: i64) -> AppResult<ResizePlan> {
    check_capacity(new_capacity)?;

    let current = spots.len() as i64;
    if new_capacity == current {
        return Ok(ResizePlan::Unchanged);
    }

    if new_capacity > current {
        let highest = spots.iter().map(|s| s.spot_number).max().unwrap_or(0);
        let numbers = (1..=new_capacity - current).map(|n| highest + n).collect();
        return Ok(ResizePlan::Grow(numbers));
    }

    let reduction = (current - new_capacity) as usize;
    let mut available: Vec<&ParkingSpot> = spots.iter().filter(|s| s.is_available()).collect();
    if available.len() < reduction {
        return Err(AppError::UnprocessableEntity(format!(
            "Cannot reduce capacity to {new_capacity}: only {} spot(s) are available and {reduction} would have to be removed.",
            available.len()
        )));
    }
    available.sort_by(|a, b| b.spot_number.cmp(&a.spot_number));

    Ok(ResizePlan::Shrink(
        available
            .into_iter()
            .take(reduction)
            .map(|s| s.spot_id)
            .collect(),
    ))
}
