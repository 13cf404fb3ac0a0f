use std::collections::HashMap;

use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{LotId, SpotId},
    lot::{
        event::{CreateLot, DeleteLot, DeleteSpot, UpdateLot},
        check_capacity, plan_resize, LotDetail, ParkingLot, ResizePlan,
    },
    spot::{ParkingSpot, SpotDetail},
};
use kernel::repository::lot::LotRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::lot::{LotRow, SpotDetailRow, SpotRow},
    ConnectionPool,
};

#[derive(new)]
pub struct LotRepositoryImpl {
    db: ConnectionPool,
}

const SELECT_LOTS: &str = r#"
    SELECT
        l.id,
        l.prime_location_name,
        l.price_per_hour,
        l.address,
        l.pin_code,
        l.maximum_number_of_spots,
        (SELECT COUNT(*) FROM parking_spots AS s
            WHERE s.lot_id = l.id AND s.status = 'A') AS available_spots,
        (SELECT COUNT(*) FROM parking_spots AS s
            WHERE s.lot_id = l.id AND s.status = 'O') AS occupied_spots
    FROM parking_lots AS l
"#;

// 区画ごとに、駐車中の予約があればその予約者も一緒に取得する
const SELECT_SPOT_DETAILS: &str = r#"
    SELECT
        s.id,
        s.lot_id,
        s.spot_number,
        s.status,
        r.id AS reservation_id,
        r.user_id,
        u.full_name,
        r.vehicle_number,
        r.parking_timestamp
    FROM parking_spots AS s
    LEFT JOIN reserved_spots AS r ON r.spot_id = s.id AND r.leaving_timestamp IS NULL
    LEFT JOIN users AS u ON u.id = r.user_id
"#;

#[async_trait]
impl LotRepository for LotRepositoryImpl {
    async fn create(&self, event: CreateLot) -> AppResult<LotId> {
        check_capacity(event.maximum_number_of_spots)?;

        let mut tx = self.db.begin().await?;

        let res = sqlx::query(
            r#"
                INSERT INTO parking_lots
                (prime_location_name, price_per_hour, address, pin_code, maximum_number_of_spots)
                VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&event.prime_location_name)
        .bind(event.price_per_hour)
        .bind(&event.address)
        .bind(&event.pin_code)
        .bind(event.maximum_number_of_spots)
        .execute(&mut *tx)
        .await
        .map_err(|e| lot_write_error(e, &event.prime_location_name))?;

        let lot_id = LotId::new(res.last_insert_rowid());

        // 区画は 1 番から capacity 番まで作る
        for spot_number in 1..=event.maximum_number_of_spots {
            insert_spot(&mut tx, lot_id, spot_number).await?;
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        tracing::info!(
            lot_id = %lot_id,
            spots = event.maximum_number_of_spots,
            "parking lot created"
        );
        Ok(lot_id)
    }

    async fn find_all(&self, keyword: Option<String>) -> AppResult<Vec<ParkingLot>> {
        let pattern = keyword
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .map(|k| format!("%{}%", escape_like(&k)));

        let sql = format!(
            r#"
                {SELECT_LOTS}
                WHERE ? IS NULL
                    OR l.prime_location_name LIKE ? ESCAPE '\'
                    OR l.address LIKE ? ESCAPE '\'
                    OR l.pin_code LIKE ? ESCAPE '\'
                ORDER BY l.id ASC
            "#
        );
        sqlx::query_as::<_, LotRow>(&sql)
            .bind(&pattern)
            .bind(&pattern)
            .bind(&pattern)
            .bind(&pattern)
            .fetch_all(self.db.inner_ref())
            .await
            .map(|rows| rows.into_iter().map(ParkingLot::from).collect())
            .map_err(AppError::SpecificOperationError)
    }

    async fn find_by_id(&self, lot_id: LotId) -> AppResult<Option<ParkingLot>> {
        let sql = format!("{SELECT_LOTS} WHERE l.id = ?");
        sqlx::query_as::<_, LotRow>(&sql)
            .bind(lot_id)
            .fetch_optional(self.db.inner_ref())
            .await
            .map(|row| row.map(ParkingLot::from))
            .map_err(AppError::SpecificOperationError)
    }

    async fn find_detail_by_id(&self, lot_id: LotId) -> AppResult<Option<LotDetail>> {
        let Some(lot) = self.find_by_id(lot_id).await? else {
            return Ok(None);
        };

        let sql = format!("{SELECT_SPOT_DETAILS} WHERE s.lot_id = ? ORDER BY s.spot_number ASC");
        let spots = sqlx::query_as::<_, SpotDetailRow>(&sql)
            .bind(lot_id)
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?
            .into_iter()
            .map(SpotDetail::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Some(LotDetail { lot, spots }))
    }

    async fn find_all_details(&self) -> AppResult<Vec<LotDetail>> {
        let lots = self.find_all(None).await?;

        let sql = format!("{SELECT_SPOT_DETAILS} ORDER BY s.lot_id ASC, s.spot_number ASC");
        let mut spots_by_lot: HashMap<LotId, Vec<SpotDetail>> = HashMap::new();
        for row in sqlx::query_as::<_, SpotDetailRow>(&sql)
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?
        {
            let spot = SpotDetail::try_from(row)?;
            spots_by_lot.entry(spot.spot.lot_id).or_default().push(spot);
        }

        Ok(lots
            .into_iter()
            .map(|lot| {
                let spots = spots_by_lot.remove(&lot.lot_id).unwrap_or_default();
                LotDetail { lot, spots }
            })
            .collect())
    }

    async fn update(&self, event: UpdateLot) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let spots = fetch_spots(&mut tx, event.lot_id).await?;
        if spots.is_empty() {
            // 区画 0 の駐車場は存在しないので、見つからなければ未登録の ID
            let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM parking_lots WHERE id = ?")
                .bind(event.lot_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
            if exists.is_none() {
                return Err(AppError::EntityNotFound(format!(
                    "Parking lot {} was not found.",
                    event.lot_id
                )));
            }
        }

        // 空き区画が足りなければここで Err になり、tx は破棄されてロールバックされる
        match plan_resize(&spots, event.maximum_number_of_spots)? {
            ResizePlan::Unchanged => {}
            ResizePlan::Grow(numbers) => {
                for spot_number in numbers {
                    insert_spot(&mut tx, event.lot_id, spot_number).await?;
                }
            }
            ResizePlan::Shrink(spot_ids) => {
                for spot_id in spot_ids {
                    delete_available_spot(&mut tx, spot_id).await?;
                }
            }
        }

        let res = sqlx::query(
            r#"
                UPDATE parking_lots
                SET
                    prime_location_name = ?,
                    price_per_hour = ?,
                    address = ?,
                    pin_code = ?,
                    maximum_number_of_spots = ?
                WHERE id = ?
            "#,
        )
        .bind(&event.prime_location_name)
        .bind(event.price_per_hour)
        .bind(&event.address)
        .bind(&event.pin_code)
        .bind(event.maximum_number_of_spots)
        .bind(event.lot_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| lot_write_error(e, &event.prime_location_name))?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "Parking lot {} was not found.",
                event.lot_id
            )));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        tracing::info!(
            lot_id = %event.lot_id,
            from = spots.len(),
            to = event.maximum_number_of_spots,
            "parking lot updated"
        );
        Ok(())
    }

    async fn delete(&self, event: DeleteLot) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let spots = fetch_spots(&mut tx, event.lot_id).await?;
        let occupied = spots.iter().filter(|s| !s.is_available()).count();
        if occupied > 0 {
            return Err(AppError::UnprocessableEntity(format!(
                "Parking lot {} cannot be deleted while {occupied} spot(s) are occupied.",
                event.lot_id
            )));
        }

        // 区画と予約履歴は ON DELETE CASCADE で一緒に消える
        let res = sqlx::query("DELETE FROM parking_lots WHERE id = ?")
            .bind(event.lot_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "Parking lot {} was not found.",
                event.lot_id
            )));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        tracing::info!(lot_id = %event.lot_id, "parking lot deleted");
        Ok(())
    }

    async fn delete_spot(&self, event: DeleteSpot) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let spot: ParkingSpot = sqlx::query_as::<_, SpotRow>(
            "SELECT id, lot_id, spot_number, status FROM parking_spots WHERE id = ?",
        )
        .bind(event.spot_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("Parking spot {} was not found.", event.spot_id))
        })?
        .try_into()?;

        if !spot.is_available() {
            return Err(AppError::UnprocessableEntity(format!(
                "Parking spot {} is occupied and cannot be deleted.",
                spot.spot_number
            )));
        }

        let remaining = fetch_spots(&mut tx, spot.lot_id).await?.len();
        if remaining <= 1 {
            return Err(AppError::UnprocessableEntity(
                "A parking lot must keep at least one spot.".into(),
            ));
        }

        delete_available_spot(&mut tx, spot.spot_id).await?;

        sqlx::query(
            r#"
                UPDATE parking_lots
                SET maximum_number_of_spots = maximum_number_of_spots - 1
                WHERE id = ?
            "#,
        )
        .bind(spot.lot_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        tracing::info!(lot_id = %spot.lot_id, spot_id = %spot.spot_id, "parking spot deleted");
        Ok(())
    }
}

// LIKE のワイルドカードを文字どおりに検索させる
fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn lot_write_error(e: sqlx::Error, name: &str) -> AppError {
    match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::UnprocessableEntity(
            format!("A parking lot named {name} already exists."),
        ),
        e => AppError::SpecificOperationError(e),
    }
}

async fn fetch_spots(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    lot_id: LotId,
) -> AppResult<Vec<ParkingSpot>> {
    sqlx::query_as::<_, SpotRow>(
        r#"
            SELECT id, lot_id, spot_number, status
            FROM parking_spots
            WHERE lot_id = ?
            ORDER BY spot_number ASC
        "#,
    )
    .bind(lot_id)
    .fetch_all(&mut **tx)
    .await
    .map_err(AppError::SpecificOperationError)?
    .into_iter()
    .map(ParkingSpot::try_from)
    .collect()
}

async fn insert_spot(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    lot_id: LotId,
    spot_number: i64,
) -> AppResult<()> {
    sqlx::query("INSERT INTO parking_spots (lot_id, spot_number, status) VALUES (?, ?, 'A')")
        .bind(lot_id)
        .bind(spot_number)
        .execute(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;
    Ok(())
}

async fn delete_available_spot(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    spot_id: SpotId,
) -> AppResult<()> {
    let res = sqlx::query("DELETE FROM parking_spots WHERE id = ? AND status = 'A'")
        .bind(spot_id)
        .execute(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

    if res.rows_affected() < 1 {
        return Err(AppError::NoRowsAffectedError(format!(
            "Parking spot {spot_id} was not deleted"
        )));
    }
    Ok(())
}
