//! Institution and service catalog management

use crate::{
    config::QueueConfig,
    error::AppResult,
    models::{
        institution::{CreateInstitution, Institution, InstitutionQuery, UpdateInstitution},
        service::{CreateService, Service},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct InstitutionsService {
    repository: Repository,
    queue_config: QueueConfig,
}

impl InstitutionsService {
    pub fn new(repository: Repository, queue_config: QueueConfig) -> Self {
        Self { repository, queue_config }
    }

    /// List institutions, optionally filtered by category
    pub async fn list(&self, query: &InstitutionQuery) -> AppResult<Vec<Institution>> {
        self.repository.institutions.list(query).await
    }

    /// Get an institution by ID
    pub async fn get(&self, id: i32) -> AppResult<Institution> {
        self.repository.institutions.get_by_id(id).await
    }

    /// Create an institution and provision its general queue
    pub async fn create(&self, institution: CreateInstitution) -> AppResult<Institution> {
        let created = self.repository.institutions.create(&institution).await?;

        self.repository
            .queues
            .create_for_scope(created.id, None, self.queue_config.default_average_service_time)
            .await?;

        Ok(created)
    }

    /// Apply administrative edits to an institution
    pub async fn update(&self, id: i32, update: UpdateInstitution) -> AppResult<Institution> {
        self.repository.institutions.update(id, &update).await
    }

    /// List the services an institution offers
    pub async fn list_services(&self, institution_id: i32) -> AppResult<Vec<Service>> {
        self.repository.institutions.get_by_id(institution_id).await?;
        self.repository.services.list_for_institution(institution_id).await
    }

    /// Create a service and provision its queue; the service's average
    /// duration seeds the queue's service-time estimate.
    pub async fn create_service(
        &self,
        institution_id: i32,
        service: CreateService,
    ) -> AppResult<Service> {
        self.repository.institutions.get_by_id(institution_id).await?;

        let created = self
            .repository
            .services
            .create(
                institution_id,
                &service,
                self.queue_config.default_average_service_time,
            )
            .await?;

        self.repository
            .queues
            .create_for_scope(
                institution_id,
                Some(created.id),
                created.average_duration_minutes,
            )
            .await?;

        Ok(created)
    }
}
