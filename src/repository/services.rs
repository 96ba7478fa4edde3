//! Services repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::service::{CreateService, Service},
};

#[derive(Clone)]
pub struct ServicesRepository {
    pool: Pool<Postgres>,
}

impl ServicesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get service by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Service> {
        sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Service with id {} not found", id)))
    }

    /// List services offered by an institution
    pub async fn list_for_institution(&self, institution_id: i32) -> AppResult<Vec<Service>> {
        let services = sqlx::query_as::<_, Service>(
            "SELECT * FROM services WHERE institution_id = $1 ORDER BY name",
        )
        .bind(institution_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    /// Create a new service for an institution
    pub async fn create(
        &self,
        institution_id: i32,
        service: &CreateService,
        default_average_duration: i32,
    ) -> AppResult<Service> {
        let created = sqlx::query_as::<_, Service>(
            r#"
            INSERT INTO services (institution_id, name, average_duration_minutes)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(institution_id)
        .bind(&service.name)
        .bind(service.average_duration_minutes.unwrap_or(default_average_duration))
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }
}
