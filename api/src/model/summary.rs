use kernel::model::{
    id::LotId,
    summary::{AdminSummary, LotRevenue, MonthlyUsage, UserSummary},
};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyUsageResponse {
    pub month: String,
    pub reservation_count: i64,
    pub revenue: f64,
}

impl From<MonthlyUsage> for MonthlyUsageResponse {
    fn from(value: MonthlyUsage) -> Self {
        let MonthlyUsage {
            month,
            reservation_count,
            revenue,
        } = value;
        Self {
            month,
            reservation_count,
            revenue,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LotRevenueResponse {
    pub lot_id: LotId,
    pub prime_location_name: String,
    pub reservation_count: i64,
    pub revenue: f64,
}

impl From<LotRevenue> for LotRevenueResponse {
    fn from(value: LotRevenue) -> Self {
        let LotRevenue {
            lot_id,
            prime_location_name,
            reservation_count,
            revenue,
        } = value;
        Self {
            lot_id,
            prime_location_name,
            reservation_count,
            revenue,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSummaryResponse {
    pub total_lots: i64,
    pub total_spots: i64,
    pub available_spots: i64,
    pub occupied_spots: i64,
    pub total_users: i64,
    pub active_reservations: i64,
    pub total_revenue: f64,
    pub lots: Vec<LotRevenueResponse>,
    pub monthly: Vec<MonthlyUsageResponse>,
}

impl From<AdminSummary> for AdminSummaryResponse {
    fn from(value: AdminSummary) -> Self {
        let AdminSummary {
            total_lots,
            total_spots,
            available_spots,
            occupied_spots,
            total_users,
            active_reservations,
            total_revenue,
            lots,
            monthly,
        } = value;
        Self {
            total_lots,
            total_spots,
            available_spots,
            occupied_spots,
            total_users,
            active_reservations,
            total_revenue,
            lots: lots.into_iter().map(LotRevenueResponse::from).collect(),
            monthly: monthly.into_iter().map(MonthlyUsageResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryResponse {
    pub reservation_count: i64,
    pub total_spent: f64,
    pub monthly: Vec<MonthlyUsageResponse>,
}

impl From<UserSummary> for UserSummaryResponse {
    fn from(value: UserSummary) -> Self {
        let UserSummary {
            reservation_count,
            total_spent,
            monthly,
        } = value;
        Self {
            reservation_count,
            total_spent,
            monthly: monthly.into_iter().map(MonthlyUsageResponse::from).collect(),
        }
    }
}
