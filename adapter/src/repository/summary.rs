use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::UserId,
    role::Role,
    summary::{AdminSummary, LotRevenue, MonthlyUsage, UserSummary},
};
use kernel::repository::summary::SummaryRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::summary::{CountsRow, LotRevenueRow, MonthlyUsageRow, UserTotalsRow},
    ConnectionPool,
};

#[derive(new)]
pub struct SummaryRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl SummaryRepository for SummaryRepositoryImpl {
    async fn admin_summary(&self) -> AppResult<AdminSummary> {
        let counts = sqlx::query_as::<_, CountsRow>(
            r#"
                SELECT
                    (SELECT COUNT(*) FROM parking_lots) AS total_lots,
                    (SELECT COUNT(*) FROM parking_spots) AS total_spots,
                    (SELECT COUNT(*) FROM parking_spots WHERE status = 'A') AS available_spots,
                    (SELECT COUNT(*) FROM parking_spots WHERE status = 'O') AS occupied_spots,
                    (SELECT COUNT(*) FROM users WHERE role = ?) AS total_users,
                    (SELECT COUNT(*) FROM reserved_spots
                        WHERE leaving_timestamp IS NULL) AS active_reservations,
                    (SELECT COALESCE(SUM(total_cost), 0.0) FROM reserved_spots) AS total_revenue
            "#,
        )
        .bind(Role::User.as_ref())
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        // 予約のない駐車場も 0 件として並べる
        let lots = sqlx::query_as::<_, LotRevenueRow>(
            r#"
                SELECT
                    l.id AS lot_id,
                    l.prime_location_name,
                    COUNT(r.id) AS reservation_count,
                    COALESCE(SUM(r.total_cost), 0.0) AS revenue
                FROM parking_lots AS l
                LEFT JOIN parking_spots AS s ON s.lot_id = l.id
                LEFT JOIN reserved_spots AS r ON r.spot_id = s.id
                GROUP BY l.id, l.prime_location_name
                ORDER BY l.id ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(LotRevenue::from)
        .collect();

        let monthly = self.monthly_usage(None).await?;

        let CountsRow {
            total_lots,
            total_spots,
            available_spots,
            occupied_spots,
            total_users,
            active_reservations,
            total_revenue,
        } = counts;
        Ok(AdminSummary {
            total_lots,
            total_spots,
            available_spots,
            occupied_spots,
            total_users,
            active_reservations,
            total_revenue,
            lots,
            monthly,
        })
    }

    async fn user_summary(&self, user_id: UserId) -> AppResult<UserSummary> {
        let totals = sqlx::query_as::<_, UserTotalsRow>(
            r#"
                SELECT
                    COUNT(*) AS reservation_count,
                    COALESCE(SUM(total_cost), 0.0) AS total_spent
                FROM reserved_spots
                WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(UserSummary {
            reservation_count: totals.reservation_count,
            total_spent: totals.total_spent,
            monthly: self.monthly_usage(Some(user_id)).await?,
        })
    }
}

impl SummaryRepositoryImpl {
    // 入庫日時の "YYYY-MM" ごとに件数と確定済み料金を集計する
    async fn monthly_usage(&self, user_id: Option<UserId>) -> AppResult<Vec<MonthlyUsage>> {
        sqlx::query_as::<_, MonthlyUsageRow>(
            r#"
                SELECT
                    substr(parking_timestamp, 1, 7) AS month,
                    COUNT(*) AS reservation_count,
                    COALESCE(SUM(total_cost), 0.0) AS revenue
                FROM reserved_spots
                WHERE ? IS NULL OR user_id = ?
                GROUP BY month
                ORDER BY month ASC
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map(|rows| rows.into_iter().map(MonthlyUsage::from).collect())
        .map_err(AppError::SpecificOperationError)
    }
}
