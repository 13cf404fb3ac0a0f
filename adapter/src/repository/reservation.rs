use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{ReservationId, SpotId, UserId},
    reservation::{
        compute_cost,
        event::{CreateReservation, ReleaseReservation},
        Reservation,
    },
};
use kernel::repository::reservation::ReservationRepository;
use shared::error::{AppError, AppResult};

use crate::database::{model::reservation::ReservationRow, ConnectionPool};

#[derive(new)]
pub struct ReservationRepositoryImpl {
    db: ConnectionPool,
}

const SELECT_RESERVATIONS: &str = r#"
    SELECT
        r.id,
        r.user_id,
        r.vehicle_number,
        r.parking_timestamp,
        r.leaving_timestamp,
        r.total_cost,
        s.id AS spot_id,
        s.spot_number,
        l.id AS lot_id,
        l.prime_location_name,
        l.price_per_hour
    FROM reserved_spots AS r
    INNER JOIN parking_spots AS s ON r.spot_id = s.id
    INNER JOIN parking_lots AS l ON s.lot_id = l.id
"#;

#[async_trait]
impl ReservationRepository for ReservationRepositoryImpl {
    async fn create(&self, event: CreateReservation) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;

        // 事前のチェックとして、以下を調べる。
        // - 指定の駐車場が存在するか
        // - ユーザーが駐車中の予約を持っていないか
        // - 空き区画があるか（あれば番号が最小のものを選ぶ）
        let spot_id = {
            let lot_name: Option<String> =
                sqlx::query_scalar("SELECT prime_location_name FROM parking_lots WHERE id = ?")
                    .bind(event.lot_id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(AppError::SpecificOperationError)?;
            let Some(lot_name) = lot_name else {
                return Err(AppError::EntityNotFound(format!(
                    "Parking lot {} was not found.",
                    event.lot_id
                )));
            };

            let open: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM reserved_spots WHERE user_id = ? AND leaving_timestamp IS NULL",
            )
            .bind(event.user_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
            if open > 0 {
                return Err(AppError::UnprocessableEntity(
                    "You already have an active reservation. Release it before booking another spot."
                        .into(),
                ));
            }

            let spot_id: Option<SpotId> = sqlx::query_scalar(
                r#"
                    SELECT id FROM parking_spots
                    WHERE lot_id = ? AND status = 'A'
                    ORDER BY spot_number ASC
                    LIMIT 1
                "#,
            )
            .bind(event.lot_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            spot_id.ok_or_else(|| {
                AppError::UnprocessableEntity(format!(
                    "No available spots in {lot_name}. Please choose another parking lot."
                ))
            })?
        };

        let res = sqlx::query("UPDATE parking_spots SET status = 'O' WHERE id = ? AND status = 'A'")
            .bind(spot_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(format!(
                "Parking spot {spot_id} could not be occupied"
            )));
        }

        let res = sqlx::query(
            r#"
                INSERT INTO reserved_spots (spot_id, user_id, vehicle_number, parking_timestamp)
                VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(spot_id)
        .bind(event.user_id)
        .bind(&event.vehicle_number)
        .bind(event.parking_timestamp)
        .execute(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::UnprocessableEntity(
                    "The spot or the user already has an active reservation.".into(),
                )
            }
            e => AppError::SpecificOperationError(e),
        })?;
        let reservation_id = ReservationId::new(res.last_insert_rowid());

        let reservation = fetch_reservation(&mut tx, reservation_id).await?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        tracing::info!(
            reservation_id = %reservation_id,
            lot_id = %event.lot_id,
            spot_number = reservation.spot.spot_number,
            "parking spot booked"
        );
        Ok(reservation)
    }

    async fn release(&self, event: ReleaseReservation) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;

        let mut reservation = fetch_reservation(&mut tx, event.reservation_id).await?;

        if reservation.user_id != event.requested_user {
            return Err(AppError::ForbiddenOperation(
                "You are not allowed to release this reservation.".into(),
            ));
        }
        if !reservation.is_open() {
            return Err(AppError::UnprocessableEntity(format!(
                "Reservation {} has already been released.",
                event.reservation_id
            )));
        }

        let total_cost = compute_cost(
            reservation.parking_timestamp,
            event.leaving_timestamp,
            reservation.spot.price_per_hour,
        );

        let res = sqlx::query(
            r#"
                UPDATE reserved_spots
                SET leaving_timestamp = ?, total_cost = ?
                WHERE id = ? AND leaving_timestamp IS NULL
            "#,
        )
        .bind(event.leaving_timestamp)
        .bind(total_cost)
        .bind(event.reservation_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been closed".into(),
            ));
        }

        sqlx::query("UPDATE parking_spots SET status = 'A' WHERE id = ?")
            .bind(reservation.spot.spot_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        reservation.leaving_timestamp = Some(event.leaving_timestamp);
        reservation.total_cost = Some(total_cost);

        tracing::info!(
            reservation_id = %event.reservation_id,
            total_cost,
            "parking spot released"
        );
        Ok(reservation)
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>> {
        let sql = format!("{SELECT_RESERVATIONS} WHERE r.id = ?");
        sqlx::query_as::<_, ReservationRow>(&sql)
            .bind(reservation_id)
            .fetch_optional(self.db.inner_ref())
            .await
            .map(|row| row.map(Reservation::from))
            .map_err(AppError::SpecificOperationError)
    }

    async fn find_open_by_user_id(&self, user_id: UserId) -> AppResult<Option<Reservation>> {
        let sql = format!("{SELECT_RESERVATIONS} WHERE r.user_id = ? AND r.leaving_timestamp IS NULL");
        sqlx::query_as::<_, ReservationRow>(&sql)
            .bind(user_id)
            .fetch_optional(self.db.inner_ref())
            .await
            .map(|row| row.map(Reservation::from))
            .map_err(AppError::SpecificOperationError)
    }

    async fn find_history_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Reservation>> {
        let sql = format!(
            "{SELECT_RESERVATIONS} WHERE r.user_id = ? ORDER BY r.parking_timestamp DESC, r.id DESC"
        );
        sqlx::query_as::<_, ReservationRow>(&sql)
            .bind(user_id)
            .fetch_all(self.db.inner_ref())
            .await
            .map(|rows| rows.into_iter().map(Reservation::from).collect())
            .map_err(AppError::SpecificOperationError)
    }
}

// トランザクション内で予約を取得する
async fn fetch_reservation(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    reservation_id: ReservationId,
) -> AppResult<Reservation> {
    let sql = format!("{SELECT_RESERVATIONS} WHERE r.id = ?");
    sqlx::query_as::<_, ReservationRow>(&sql)
        .bind(reservation_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(Reservation::from)
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("Reservation {reservation_id} was not found."))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::SqlitePool;
    use crate::{
        repository::{
            fixture::{seed_lot, seed_user},
            lot::LotRepositoryImpl,
        },
    };
    use chrono::{Duration, Utc};
    use kernel::model::id::LotId;
    use kernel::repository::lot::LotRepository;

    fn booking(lot_id: LotId, user_id: UserId) -> CreateReservation {
        CreateReservation::new(lot_id, user_id, "KA01AB1234".into(), Utc::now())
    }

    #[sqlx::test]
    async fn test_booking_takes_lowest_available_spot(pool: SqlitePool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let lots = LotRepositoryImpl::new(db.clone());
        let repo = ReservationRepositoryImpl::new(db.clone());
        let lot_id = seed_lot(&db, "Central", 10.0, 3).await;
        let alice = seed_user(&db, "alice@example.com").await;
        let bob = seed_user(&db, "bob@example.com").await;

        let first = repo.create(booking(lot_id, alice)).await?;
        assert_eq!(first.spot.spot_number, 1);
        assert!(first.is_open());
        assert_eq!(lots.find_by_id(lot_id).await?.unwrap().available_spots, 2);

        let second = repo.create(booking(lot_id, bob)).await?;
        assert_eq!(second.spot.spot_number, 2);
        assert_eq!(lots.find_by_id(lot_id).await?.unwrap().available_spots, 1);

        // 1 番が空けば次の予約は 1 番になる
        repo.release(ReleaseReservation::new(first.reservation_id, alice, Utc::now()))
            .await?;
        let carol = seed_user(&db, "carol@example.com").await;
        let third = repo.create(booking(lot_id, carol)).await?;
        assert_eq!(third.spot.spot_number, 1);
        Ok(())
    }

    #[sqlx::test]
    async fn test_user_cannot_hold_two_open_reservations(pool: SqlitePool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let repo = ReservationRepositoryImpl::new(db.clone());
        let lot_a = seed_lot(&db, "A", 10.0, 2).await;
        let lot_b = seed_lot(&db, "B", 10.0, 2).await;
        let user = seed_user(&db, "user@example.com").await;

        repo.create(booking(lot_a, user)).await?;
        let res = repo.create(booking(lot_b, user)).await;
        assert!(matches!(res, Err(AppError::UnprocessableEntity(_))));
        assert_eq!(repo.find_history_by_user_id(user).await?.len(), 1);
        Ok(())
    }

    #[sqlx::test]
    async fn test_full_lot_rejects_booking_without_changes(pool: SqlitePool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let lots = LotRepositoryImpl::new(db.clone());
        let repo = ReservationRepositoryImpl::new(db.clone());
        let lot_id = seed_lot(&db, "Tiny", 10.0, 1).await;
        let alice = seed_user(&db, "alice@example.com").await;
        let bob = seed_user(&db, "bob@example.com").await;

        repo.create(booking(lot_id, alice)).await?;
        let res = repo.create(booking(lot_id, bob)).await;
        assert!(matches!(res, Err(AppError::UnprocessableEntity(_))));
        assert!(repo.find_open_by_user_id(bob).await?.is_none());
        assert_eq!(lots.find_by_id(lot_id).await?.unwrap().occupied_spots, 1);

        let res = repo.create(booking(LotId::new(999), bob)).await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
        Ok(())
    }

    #[sqlx::test]
    async fn test_release_computes_cost_and_frees_spot(pool: SqlitePool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let lots = LotRepositoryImpl::new(db.clone());
        let repo = ReservationRepositoryImpl::new(db.clone());
        let lot_id = seed_lot(&db, "Central", 10.0, 1).await;
        let user = seed_user(&db, "user@example.com").await;

        let parked_at = Utc::now() - Duration::hours(2);
        let reservation = repo
            .create(CreateReservation::new(
                lot_id,
                user,
                "KA01AB1234".into(),
                parked_at,
            ))
            .await?;

        let released = repo
            .release(ReleaseReservation::new(
                reservation.reservation_id,
                user,
                parked_at + Duration::hours(2),
            ))
            .await?;
        assert_eq!(released.total_cost, Some(20.00));
        assert!(!released.is_open());

        let stored = repo.find_by_id(reservation.reservation_id).await?.unwrap();
        assert_eq!(stored.total_cost, Some(20.00));
        assert!(stored.leaving_timestamp.is_some());
        assert_eq!(lots.find_by_id(lot_id).await?.unwrap().available_spots, 1);
        assert!(repo.find_open_by_user_id(user).await?.is_none());
        Ok(())
    }

    #[sqlx::test]
    async fn test_release_checks_owner_and_state(pool: SqlitePool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let repo = ReservationRepositoryImpl::new(db.clone());
        let lot_id = seed_lot(&db, "Central", 10.0, 2).await;
        let owner = seed_user(&db, "owner@example.com").await;
        let other = seed_user(&db, "other@example.com").await;

        let reservation = repo.create(booking(lot_id, owner)).await?;
        let id = reservation.reservation_id;

        let res = repo
            .release(ReleaseReservation::new(id, other, Utc::now()))
            .await;
        assert!(matches!(res, Err(AppError::ForbiddenOperation(_))));

        repo.release(ReleaseReservation::new(id, owner, Utc::now()))
            .await?;
        let res = repo
            .release(ReleaseReservation::new(id, owner, Utc::now()))
            .await;
        assert!(matches!(res, Err(AppError::UnprocessableEntity(_))));

        let res = repo
            .release(ReleaseReservation::new(ReservationId::new(999), owner, Utc::now()))
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
        Ok(())
    }
}
