use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::schedule::{RecordId, ServiceSchedule};

/// One slot as the backend stores it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SlotRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
}

/// Flat per-(restaurant, day, order type) record, used in both directions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DayScheduleRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// 1 = Sunday .. 7 = Saturday
    pub day_of_week: i16,
    /// 1 = enabled, 0 = disabled
    pub status: i16,
    /// 1 = dine-in, 2 = takeaway, 3 = delivery
    pub order_type_id: i16,
    #[serde(default)]
    pub slots: Vec<SlotRecord>,
}

/// Response for service-hours mutations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceHoursMutationResponse {
    pub success: bool,
    pub message: Option<String>,
}

/// Structured view of a restaurant's service hours, always 3 x 7 days
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WeeklyScheduleResponse {
    pub restaurant_id: i32,
    /// Display label only; times are never converted
    pub timezone: String,
    pub dine_in: ServiceSchedule,
    pub takeaway: ServiceSchedule,
    pub delivery: ServiceSchedule,
}
