use super::model::ServiceType;
use super::store::StorePhase;
use super::validator::IncompleteSection;

/// Loading the schedule from the backend failed.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Failed to fetch service hours: {reason}")]
pub struct FetchError {
    pub reason: String,
}

impl FetchError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// The backend rejected a full-replace write.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Failed to save service hours: {}", .message.as_deref().unwrap_or("no message from backend"))]
pub struct SaveError {
    /// Human-readable message from the backend, if it sent one
    pub message: Option<String>,
}

impl SaveError {
    pub fn new(message: Option<String>) -> Self {
        Self { message }
    }
}

/// At least one enabled day has a slot with a blank time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Please enter a valid time ({} incomplete section(s))", .incomplete.len())]
pub struct ValidationError {
    pub incomplete: Vec<IncompleteSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Day of week {0} is outside 1..7")]
    UnknownDay(u8),

    #[error("No slot {index} on {service_type} day {day_of_week}")]
    SlotOutOfRange {
        service_type: ServiceType,
        day_of_week: u8,
        index: usize,
    },

    #[error("{service_type} day {day_of_week} is disabled")]
    DayDisabled { service_type: ServiceType, day_of_week: u8 },

    #[error("Cannot remove the last slot of {service_type} day {day_of_week}")]
    LastSlot { service_type: ServiceType, day_of_week: u8 },

    #[error("Cannot copy {0} onto itself")]
    SelfCopy(ServiceType),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Schedule store is busy ({0:?})")]
    Busy(StorePhase),

    #[error("No schedule is open")]
    NotOpen,

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Save(#[from] SaveError),
}
