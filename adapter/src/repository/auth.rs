use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use derive_new::new;
use kernel::model::{
    auth::{event::CreateToken, AccessToken},
    id::UserId,
};
use kernel::repository::auth::AuthRepository;
use shared::error::{AppError, AppResult};

use crate::database::{model::user::UserCredentialRow, ConnectionPool};

#[derive(new)]
pub struct AuthRepositoryImpl {
    db: ConnectionPool,
    ttl: u64,
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    user_id: UserId,
    expires_at: DateTime<Utc>,
}

#[async_trait]
impl AuthRepository for AuthRepositoryImpl {
    async fn fetch_user_id_from_token(
        &self,
        access_token: &AccessToken,
    ) -> AppResult<Option<UserId>> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT user_id, expires_at FROM sessions WHERE token = ?",
        )
        .bind(access_token.as_str())
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        match row {
            Some(SessionRow {
                user_id,
                expires_at,
            }) if expires_at > Utc::now() => Ok(Some(user_id)),
            Some(_) => {
                // 期限切れのセッションはここで掃除する
                self.delete_token(access_token.clone()).await?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn verify_user(&self, email: &str, password: &str) -> AppResult<UserId> {
        let row = sqlx::query_as::<_, UserCredentialRow>(
            "SELECT id, password_hash FROM users WHERE email_id = ?",
        )
        .bind(email)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(row) = row else {
            return Err(AppError::UnauthenticatedError);
        };

        if !bcrypt::verify(password, &row.password_hash)? {
            return Err(AppError::UnauthenticatedError);
        }

        Ok(row.id)
    }

    async fn create_token(&self, event: CreateToken) -> AppResult<AccessToken> {
        let now = Utc::now();
        let access_token = AccessToken(uuid::Uuid::new_v4().simple().to_string());
        let expires_at = now + Duration::seconds(self.ttl as i64);

        // 放置された期限切れセッションもログインのたびに掃除する
        sqlx::query("DELETE FROM sessions WHERE julianday(expires_at) <= julianday(?)")
            .bind(now)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES (?, ?, ?)")
            .bind(access_token.as_str())
            .bind(event.user_id)
            .bind(expires_at)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        Ok(access_token)
    }

    async fn delete_token(&self, access_token: AccessToken) -> AppResult<()> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(access_token.as_str())
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::SqlitePool;
    use crate::repository::fixture::seed_user;

    #[sqlx::test]
    async fn test_login_and_token_lifecycle(pool: SqlitePool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let user_id = seed_user(&db, "login@example.com").await;
        let repo = AuthRepositoryImpl::new(db, 3600);

        let verified = repo.verify_user("login@example.com", "password").await?;
        assert_eq!(verified, user_id);

        let token = repo.create_token(CreateToken::new(user_id)).await?;
        assert_eq!(repo.fetch_user_id_from_token(&token).await?, Some(user_id));

        repo.delete_token(token.clone()).await?;
        assert_eq!(repo.fetch_user_id_from_token(&token).await?, None);
        Ok(())
    }

    #[sqlx::test]
    async fn test_wrong_password_is_rejected(pool: SqlitePool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        seed_user(&db, "wrong@example.com").await;
        let repo = AuthRepositoryImpl::new(db, 3600);

        let res = repo.verify_user("wrong@example.com", "nope").await;
        assert!(matches!(res, Err(AppError::UnauthenticatedError)));
        let res = repo.verify_user("missing@example.com", "password").await;
        assert!(matches!(res, Err(AppError::UnauthenticatedError)));
        Ok(())
    }

    #[sqlx::test]
    async fn test_expired_token_is_not_accepted(pool: SqlitePool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let user_id = seed_user(&db, "expired@example.com").await;
        let repo = AuthRepositoryImpl::new(db, 0);

        let token = repo.create_token(CreateToken::new(user_id)).await?;
        assert_eq!(repo.fetch_user_id_from_token(&token).await?, None);
        Ok(())
    }

    #[sqlx::test]
    async fn test_login_purges_expired_sessions(pool: SqlitePool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let user_id = seed_user(&db, "purge@example.com").await;
        let expired = AuthRepositoryImpl::new(db.clone(), 0);
        let live = AuthRepositoryImpl::new(db.clone(), 3600);

        expired.create_token(CreateToken::new(user_id)).await?;
        expired.create_token(CreateToken::new(user_id)).await?;
        let token = live.create_token(CreateToken::new(user_id)).await?;

        let tokens: Vec<String> = sqlx::query_scalar("SELECT token FROM sessions")
            .fetch_all(db.inner_ref())
            .await?;
        assert_eq!(tokens, vec![token.as_str().to_string()]);
        Ok(())
    }
}
