//! Institutions repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::institution::{CreateInstitution, Institution, InstitutionQuery, UpdateInstitution},
};

#[derive(Clone)]
pub struct InstitutionsRepository {
    pool: Pool<Postgres>,
}

impl InstitutionsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get institution by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Institution> {
        sqlx::query_as::<_, Institution>("SELECT * FROM institutions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Institution with id {} not found", id)))
    }

    /// List institutions, optionally filtered by category
    pub async fn list(&self, query: &InstitutionQuery) -> AppResult<Vec<Institution>> {
        let skip = query.skip.unwrap_or(0).max(0);
        let limit = query.limit.unwrap_or(100).clamp(1, 500);

        let institutions = sqlx::query_as::<_, Institution>(
            r#"
            SELECT * FROM institutions
            WHERE ($1::text IS NULL OR category = $1)
            ORDER BY name
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(query.category.map(|c| c.as_str()))
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(institutions)
    }

    /// Create a new institution
    pub async fn create(&self, institution: &CreateInstitution) -> AppResult<Institution> {
        let created = sqlx::query_as::<_, Institution>(
            r#"
            INSERT INTO institutions (name, category, location, address, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&institution.name)
        .bind(institution.category)
        .bind(&institution.location)
        .bind(&institution.address)
        .bind(&institution.phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update an institution (administrative edits only; category is fixed)
    pub async fn update(&self, id: i32, update: &UpdateInstitution) -> AppResult<Institution> {
        sqlx::query_as::<_, Institution>(
            r#"
            UPDATE institutions
            SET name = COALESCE($2, name),
                location = COALESCE($3, location),
                address = COALESCE($4, address),
                phone = COALESCE($5, phone)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.location)
        .bind(&update.address)
        .bind(&update.phone)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Institution with id {} not found", id)))
    }
}
