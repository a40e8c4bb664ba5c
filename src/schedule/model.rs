use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Backend identifier of a day row or slot row.
pub type RecordId = i32;

pub const DEFAULT_START_TIME: &str = "10:00";
pub const DEFAULT_END_TIME: &str = "23:00";

/// Day numbering used on the wire: 1 = Sunday .. 7 = Saturday.
pub const DAYS_OF_WEEK: std::ops::RangeInclusive<u8> = 1..=7;

/// One of the three independent schedule axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    DineIn,
    Takeaway,
    Delivery,
}

impl ServiceType {
    pub const ALL: [ServiceType; 3] = [ServiceType::DineIn, ServiceType::Takeaway, ServiceType::Delivery];

    /// `order_type_id` used by the flat backend records.
    pub fn order_type_id(self) -> i16 {
        match self {
            ServiceType::DineIn => 1,
            ServiceType::Takeaway => 2,
            ServiceType::Delivery => 3,
        }
    }

    pub fn from_order_type_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(ServiceType::DineIn),
            2 => Some(ServiceType::Takeaway),
            3 => Some(ServiceType::Delivery),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            ServiceType::DineIn => 0,
            ServiceType::Takeaway => 1,
            ServiceType::Delivery => 2,
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ServiceType::DineIn => "dine_in",
            ServiceType::Takeaway => "takeaway",
            ServiceType::Delivery => "delivery",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Enabled,
    Disabled,
}

impl DayStatus {
    /// Wire value: 1 = enabled, 0 = disabled.
    pub fn as_flag(self) -> i16 {
        match self {
            DayStatus::Enabled => 1,
            DayStatus::Disabled => 0,
        }
    }

    /// Anything other than 1 is read as disabled.
    pub fn from_flag(flag: i16) -> Self {
        if flag == 1 {
            DayStatus::Enabled
        } else {
            DayStatus::Disabled
        }
    }

    pub fn is_enabled(self) -> bool {
        self == DayStatus::Enabled
    }
}

/// Which end of a slot an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SlotField {
    StartTime,
    EndTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TimeSlot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub start_time: String,
    pub end_time: String,
}

impl TimeSlot {
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            id: None,
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.start_time.trim().is_empty() && !self.end_time.trim().is_empty()
    }

    pub fn set(&mut self, field: SlotField, value: String) {
        match field {
            SlotField::StartTime => self.start_time = value,
            SlotField::EndTime => self.end_time = value,
        }
    }
}

impl Default for TimeSlot {
    fn default() -> Self {
        Self::new(DEFAULT_START_TIME, DEFAULT_END_TIME)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DaySchedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub day_of_week: u8,
    pub status: DayStatus,
    pub slots: Vec<TimeSlot>,
    pub service_type: ServiceType,
}

impl DaySchedule {
    /// Enabled, one 10:00-23:00 slot, not yet stored.
    pub fn default_for(service_type: ServiceType, day_of_week: u8) -> Self {
        Self {
            id: None,
            day_of_week,
            status: DayStatus::Enabled,
            slots: vec![TimeSlot::default()],
            service_type,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.status.is_enabled()
    }
}

/// Seven days of one service type, kept in day order.
///
/// Outside the crate, days change only through schedule commands:
///
/// ```compile_fail
/// use service_hours::schedule::{ServiceType, WeeklySchedule};
///
/// let mut schedule = WeeklySchedule::default();
/// schedule.service_mut(ServiceType::DineIn).day_mut(1).unwrap().day_of_week = 3;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ServiceSchedule {
    pub service_type: ServiceType,
    days: Vec<DaySchedule>,
}

impl ServiceSchedule {
    pub fn default_for(service_type: ServiceType) -> Self {
        Self {
            service_type,
            days: DAYS_OF_WEEK
                .map(|day| DaySchedule::default_for(service_type, day))
                .collect(),
        }
    }

    /// Builds a schedule from one entry per day. Missing days are filled with
    /// the default day; entries for other service types or out-of-range days
    /// are ignored, and a later entry for the same day wins.
    pub fn from_days(service_type: ServiceType, days: impl IntoIterator<Item = DaySchedule>) -> Self {
        let mut schedule = Self::default_for(service_type);
        for mut day in days {
            if day.service_type != service_type || !DAYS_OF_WEEK.contains(&day.day_of_week) {
                continue;
            }
            day.service_type = service_type;
            let index = usize::from(day.day_of_week - 1);
            schedule.days[index] = day;
        }
        schedule
    }

    pub fn day(&self, day_of_week: u8) -> Option<&DaySchedule> {
        if !DAYS_OF_WEEK.contains(&day_of_week) {
            return None;
        }
        self.days.get(usize::from(day_of_week - 1))
    }

    // Crate-only: `day_of_week` and `service_type` of each entry stay fixed
    pub(crate) fn day_mut(&mut self, day_of_week: u8) -> Option<&mut DaySchedule> {
        if !DAYS_OF_WEEK.contains(&day_of_week) {
            return None;
        }
        self.days.get_mut(usize::from(day_of_week - 1))
    }

    pub fn days(&self) -> &[DaySchedule] {
        &self.days
    }

    pub(crate) fn days_mut(&mut self) -> impl Iterator<Item = &mut DaySchedule> {
        self.days.iter_mut()
    }
}

/// The full 3 x 7 aggregate; the unit of load and save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklySchedule {
    services: [ServiceSchedule; 3],
}

impl WeeklySchedule {
    pub fn service(&self, service_type: ServiceType) -> &ServiceSchedule {
        &self.services[service_type.index()]
    }

    pub fn service_mut(&mut self, service_type: ServiceType) -> &mut ServiceSchedule {
        &mut self.services[service_type.index()]
    }

    /// Swaps in a whole service schedule under its own service type.
    pub fn replace(&mut self, service: ServiceSchedule) {
        let index = service.service_type.index();
        self.services[index] = service;
    }

    pub fn day(&self, service_type: ServiceType, day_of_week: u8) -> Option<&DaySchedule> {
        self.service(service_type).day(day_of_week)
    }

    pub fn services(&self) -> impl Iterator<Item = &ServiceSchedule> {
        self.services.iter()
    }

    pub fn day_count(&self) -> usize {
        self.services.iter().map(|s| s.days().len()).sum()
    }
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        Self {
            services: ServiceType::ALL.map(ServiceSchedule::default_for),
        }
    }
}
