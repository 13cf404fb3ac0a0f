use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::UserId,
    role::Role,
    user::{event::CreateUser, User, UserOverview},
};
use kernel::repository::user::UserRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::user::{UserOverviewRow, UserRow},
    ConnectionPool,
};

#[derive(new)]
pub struct UserRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(&self, event: CreateUser) -> AppResult<User> {
        let password_hash = hash_password(&event.password)?;
        let res = sqlx::query(
            r#"
                INSERT INTO users (email_id, password_hash, full_name, address, pin_code, role)
                VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&event.email)
        .bind(&password_hash)
        .bind(&event.full_name)
        .bind(&event.address)
        .bind(&event.pin_code)
        .bind(event.role.as_ref())
        .execute(self.db.inner_ref())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::UnprocessableEntity(format!(
                    "A user with email {} already exists.",
                    event.email
                ))
            }
            e => AppError::SpecificOperationError(e),
        })?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No user record has been created".into(),
            ));
        }

        Ok(User {
            user_id: UserId::new(res.last_insert_rowid()),
            email: event.email,
            full_name: event.full_name,
            address: event.address,
            pin_code: event.pin_code,
            role: event.role,
        })
    }

    async fn find_current_user(&self, user_id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(
            r#"
                SELECT id, email_id, full_name, address, pin_code, role
                FROM users
                WHERE id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(User::try_from)
        .transpose()
    }

    async fn find_all_by_role(&self, role: Role) -> AppResult<Vec<UserOverview>> {
        sqlx::query_as::<_, UserOverviewRow>(
            r#"
                SELECT
                    u.id, u.email_id, u.full_name, u.address, u.pin_code, u.role,
                    (SELECT COUNT(*) FROM reserved_spots AS r
                        WHERE r.user_id = u.id AND r.leaving_timestamp IS NULL) AS open_reservations,
                    (SELECT COUNT(*) FROM reserved_spots AS r
                        WHERE r.user_id = u.id) AS reservation_count
                FROM users AS u
                WHERE u.role = ?
                ORDER BY u.id ASC
            "#,
        )
        .bind(role.as_ref())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(UserOverview::try_from)
        .collect()
    }

    async fn exists_with_role(&self, role: Role) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = ?")
            .bind(role.as_ref())
            .fetch_one(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(count > 0)
    }
}

fn hash_password(password: &str) -> AppResult<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(AppError::from)
}
