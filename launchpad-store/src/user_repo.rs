use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use launchpad_core::{CoreError, CoreResult, UserStore};
use launchpad_shared::{LaunchId, User, UserId};
use sqlx::PgPool;
use uuid::Uuid;

pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn store_error(err: sqlx::Error) -> CoreError {
    tracing::error!("User store query failed: {}", err);
    CoreError::Store(err.to_string())
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find_or_create(&self, email: &str) -> CoreResult<User> {
        // The unique index on email settles concurrent first logins.
        sqlx::query(
            r#"
            INSERT INTO users (id, email)
            VALUES ($1, $2)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map(User::from)
        .map_err(store_error)
    }

    async fn launch_ids_by_user(&self, user_id: UserId) -> CoreResult<BTreeSet<LaunchId>> {
        let ids: Vec<i64> = sqlx::query_scalar("SELECT launch_id FROM trips WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(ids.into_iter().collect())
    }

    async fn is_booked(&self, user_id: UserId, launch_id: LaunchId) -> CoreResult<bool> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM trips WHERE user_id = $1 AND launch_id = $2)",
        )
        .bind(user_id)
        .bind(launch_id)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)
    }

    async fn add_trips(&self, user_id: UserId, launch_ids: &[LaunchId]) -> CoreResult<Vec<LaunchId>> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;

        // Row lock serializes trip updates for this user across instances.
        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(store_error)?
            .ok_or_else(|| CoreError::Store(format!("user {} does not exist", user_id)))?;

        sqlx::query(
            r#"
            INSERT INTO trips (user_id, launch_id)
            SELECT $1, UNNEST($2::BIGINT[])
            ON CONFLICT (user_id, launch_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(launch_ids)
        .execute(&mut *tx)
        .await
        .map_err(store_error)?;

        let booked: Vec<i64> = sqlx::query_scalar(
            "SELECT launch_id FROM trips WHERE user_id = $1 AND launch_id = ANY($2)",
        )
        .bind(user_id)
        .bind(launch_ids)
        .fetch_all(&mut *tx)
        .await
        .map_err(store_error)?;

        tx.commit().await.map_err(store_error)?;

        Ok(launch_ids.iter().copied().filter(|id| booked.contains(id)).collect())
    }

    async fn remove_trip(&self, user_id: UserId, launch_id: LaunchId) -> CoreResult<bool> {
        let res = sqlx::query("DELETE FROM trips WHERE user_id = $1 AND launch_id = $2")
            .bind(user_id)
            .bind(launch_id)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(res.rows_affected() > 0)
    }
}
