//! Data models for Guichet

pub mod enums;
pub mod institution;
pub mod queue;
pub mod service;
pub mod ticket;
pub mod user;

// Re-export commonly used types
pub use enums::{InstitutionCategory, TicketStatus, UserRole};
pub use institution::Institution;
pub use queue::Queue;
pub use service::Service;
pub use ticket::Ticket;
pub use user::User;
