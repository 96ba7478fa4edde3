//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, health, institutions, operator, queues, stats, tickets};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Guichet API",
        version = "1.0.0",
        description = "Queue Management System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "Guichet Team", email = "contact@guichet.org")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    modifiers(&SecurityAddon),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::signup,
        auth::login,
        auth::me,
        // Institutions
        institutions::list_institutions,
        institutions::get_institution,
        institutions::create_institution,
        institutions::update_institution,
        institutions::list_services,
        institutions::create_service,
        institutions::list_waiting_tickets,
        // Tickets
        tickets::create_ticket,
        tickets::get_ticket,
        tickets::get_ticket_stats,
        tickets::cancel_ticket,
        tickets::get_user_tickets,
        // Operator
        operator::call_next,
        operator::start_ticket,
        operator::complete_ticket,
        operator::miss_ticket,
        operator::get_operator_stats,
        // Queues
        queues::get_queue_info,
        // Admin
        stats::get_admin_stats,
        stats::list_operators,
        stats::list_institution_operators,
    ),
    components(
        schemas(
            // Enums
            crate::models::enums::UserRole,
            crate::models::enums::InstitutionCategory,
            crate::models::enums::TicketStatus,
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            crate::models::user::User,
            crate::models::user::CreateUser,
            // Institutions
            crate::models::institution::Institution,
            crate::models::institution::CreateInstitution,
            crate::models::institution::UpdateInstitution,
            crate::models::service::Service,
            crate::models::service::CreateService,
            // Tickets
            crate::models::ticket::Ticket,
            crate::models::ticket::TicketDetails,
            crate::models::ticket::CreateTicket,
            crate::models::ticket::TicketStats,
            // Operator
            operator::CallNextRequest,
            operator::NextTicketResponse,
            operator::OperatorStats,
            // Queues
            crate::models::queue::QueueInfo,
            // Admin
            stats::AdminStats,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "institutions", description = "Institution and service catalog"),
        (name = "tickets", description = "Ticket creation and tracking"),
        (name = "operator", description = "Operator desk actions"),
        (name = "queues", description = "Queue status"),
        (name = "admin", description = "Administrative statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
