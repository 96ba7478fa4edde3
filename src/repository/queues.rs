//! Queue counters repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::queue::Queue,
};

#[derive(Clone)]
pub struct QueuesRepository {
    pool: Pool<Postgres>,
}

impl QueuesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get the counter row for a queue scope. `service_id = None` addresses
    /// the institution's general queue.
    pub async fn get_for_scope(
        &self,
        institution_id: i32,
        service_id: Option<i32>,
    ) -> AppResult<Option<Queue>> {
        let queue = sqlx::query_as::<_, Queue>(
            r#"
            SELECT * FROM queues
            WHERE institution_id = $1 AND COALESCE(service_id, 0) = COALESCE($2, 0)
            "#,
        )
        .bind(institution_id)
        .bind(service_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(queue)
    }

    /// Provision the counter row for a queue scope. Idempotent; called when
    /// an institution or service is created.
    pub async fn create_for_scope(
        &self,
        institution_id: i32,
        service_id: Option<i32>,
        average_service_time: i32,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO queues (institution_id, service_id, average_service_time)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(institution_id)
        .bind(service_id)
        .bind(average_service_time)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Count tickets currently waiting in a queue scope
    pub async fn count_waiting(
        &self,
        institution_id: i32,
        service_id: Option<i32>,
    ) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM tickets
            WHERE institution_id = $1
              AND COALESCE(service_id, 0) = COALESCE($2, 0)
              AND status = 'waiting'
            "#,
        )
        .bind(institution_id)
        .bind(service_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
