//! Business logic services

pub mod auth;
pub mod institutions;
pub mod queues;
pub mod stats;
pub mod tickets;

use crate::{
    config::{AuthConfig, QueueConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub institutions: institutions::InstitutionsService,
    pub tickets: tickets::TicketsService,
    pub queues: queues::QueuesService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig, queue_config: QueueConfig) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            institutions: institutions::InstitutionsService::new(repository.clone(), queue_config.clone()),
            tickets: tickets::TicketsService::new(repository.clone(), queue_config.clone()),
            queues: queues::QueuesService::new(repository.clone(), queue_config),
            stats: stats::StatsService::new(repository),
        }
    }
}
