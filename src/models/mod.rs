pub mod service_hours;

pub use service_hours::{DayScheduleRecord, ServiceHoursMutationResponse, SlotRecord, WeeklyScheduleResponse};
