use serde::Serialize;
use utoipa::ToSchema;

use super::error::ValidationError;
use super::model::{ServiceType, WeeklySchedule};

/// An enabled day that still has a slot with an empty start or end time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct IncompleteSection {
    pub service_type: ServiceType,
    pub day_of_week: u8,
}

/// Whether the schedule may be submitted. Disabled days always pass; enabled
/// days need both times of every slot to be non-blank. Slot ordering and
/// overlap are not checked.
pub fn is_valid(schedule: &WeeklySchedule) -> bool {
    incomplete_sections(schedule).is_empty()
}

/// Same predicate as [`is_valid`], reporting every failing section.
pub fn validate(schedule: &WeeklySchedule) -> Result<(), ValidationError> {
    let incomplete = incomplete_sections(schedule);
    if incomplete.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { incomplete })
    }
}

fn incomplete_sections(schedule: &WeeklySchedule) -> Vec<IncompleteSection> {
    schedule
        .services()
        .flat_map(|service| service.days())
        .filter(|day| day.is_enabled() && !day.slots.iter().all(|slot| slot.is_complete()))
        .map(|day| IncompleteSection {
            service_type: day.service_type,
            day_of_week: day.day_of_week,
        })
        .collect()
}
