use crate::model::id::LotId;

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyUsage {
    // "YYYY-MM"
    pub month: String,
    pub reservation_count: i64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LotRevenue {
    pub lot_id: LotId,
    pub prime_location_name: String,
    pub reservation_count: i64,
    pub revenue: f64,
}

#[derive(Debug)]
pub struct AdminSummary {
    pub total_lots: i64,
    pub total_spots: i64,
    pub available_spots: i64,
    pub occupied_spots: i64,
    pub total_users: i64,
    pub active_reservations: i64,
    pub total_revenue: f64,
    pub lots: Vec<LotRevenue>,
    pub monthly: Vec<MonthlyUsage>,
}

#[derive(Debug)]
pub struct UserSummary {
    pub reservation_count: i64,
    pub total_spent: f64,
    pub monthly: Vec<MonthlyUsage>,
}
