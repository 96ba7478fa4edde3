//! Repository layer for database operations

pub mod institutions;
pub mod queues;
pub mod services;
pub mod tickets;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub institutions: institutions::InstitutionsRepository,
    pub services: services::ServicesRepository,
    pub users: users::UsersRepository,
    pub tickets: tickets::TicketsRepository,
    pub queues: queues::QueuesRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            institutions: institutions::InstitutionsRepository::new(pool.clone()),
            services: services::ServicesRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            tickets: tickets::TicketsRepository::new(pool.clone()),
            queues: queues::QueuesRepository::new(pool.clone()),
            pool,
        }
    }
}
