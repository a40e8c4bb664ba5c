//! Weekly service-hours model and the editing session built on it.

pub mod commands;
pub mod copy;
pub mod error;
pub mod model;
pub mod normalizer;
pub mod port;
pub mod store;
pub mod validator;

pub use commands::{apply, ScheduleCommand};
pub use copy::copy_service_schedule;
pub use error::{CommandError, FetchError, SaveError, StoreError, ValidationError};
pub use model::{
    DaySchedule, DayStatus, RecordId, ServiceSchedule, ServiceType, SlotField, TimeSlot, WeeklySchedule,
};
pub use normalizer::{from_backend, from_submission, normalize_time, to_backend};
pub use port::SchedulePort;
pub use store::{LoadOutcome, ScheduleStore, StorePhase};
pub use validator::{is_valid, validate, IncompleteSection};
