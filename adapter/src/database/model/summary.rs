use kernel::model::{
    id::LotId,
    summary::{LotRevenue, MonthlyUsage},
};

#[derive(sqlx::FromRow)]
pub struct CountsRow {
    pub total_lots: i64,
    pub total_spots: i64,
    pub available_spots: i64,
    pub occupied_spots: i64,
    pub total_users: i64,
    pub active_reservations: i64,
    pub total_revenue: f64,
}

#[derive(sqlx::FromRow)]
pub struct LotRevenueRow {
    pub lot_id: LotId,
    pub prime_location_name: String,
    pub reservation_count: i64,
    pub revenue: f64,
}

impl From<LotRevenueRow> for LotRevenue {
    fn from(value: LotRevenueRow) -> Self {
        let LotRevenueRow {
            lot_id,
            prime_location_name,
            reservation_count,
            revenue,
        } = value;
        LotRevenue {
            lot_id,
            prime_location_name,
            reservation_count,
            revenue,
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct MonthlyUsageRow {
    pub month: String,
    pub reservation_count: i64,
    pub revenue: f64,
}

impl From<MonthlyUsageRow> for MonthlyUsage {
    fn from(value: MonthlyUsageRow) -> Self {
        MonthlyUsage {
            month: value.month,
            reservation_count: value.reservation_count,
            revenue: value.revenue,
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct UserTotalsRow {
    pub reservation_count: i64,
    pub total_spent: f64,
}
