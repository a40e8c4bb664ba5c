use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::Modify;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Service Hours API",
        version = "1.0.0",
        description = "Weekly dine-in, takeaway and delivery hours per restaurant"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        // Health
        crate::handlers::health::health_check,

        // Service hours
        crate::handlers::service_hours_handler::get_service_hours,
        crate::handlers::service_hours_handler::get_weekly_schedule,
        crate::handlers::service_hours_handler::replace_service_hours,
    ),
    components(
        schemas(
            crate::models::DayScheduleRecord,
            crate::models::SlotRecord,
            crate::models::ServiceHoursMutationResponse,
            crate::models::WeeklyScheduleResponse,
            crate::schedule::ServiceSchedule,
            crate::schedule::DaySchedule,
            crate::schedule::TimeSlot,
            crate::schedule::ServiceType,
            crate::schedule::DayStatus,
            crate::schedule::IncompleteSection,
        )
    ),
    tags(
        (name = "health", description = "Health check"),
        (name = "service-hours", description = "Restaurant service hours"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(
                    crate::middleware::api_key::API_KEY_HEADER,
                ))),
            )
        }
    }
}
