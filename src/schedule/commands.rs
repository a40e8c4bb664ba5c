//! Edit commands. Each one maps the prior schedule to a new one and leaves
//! the input untouched.

use super::copy::copy_service_schedule;
use super::error::CommandError;
use super::model::{DaySchedule, DayStatus, ServiceType, SlotField, TimeSlot, WeeklySchedule};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleCommand {
    ToggleDay {
        service_type: ServiceType,
        day_of_week: u8,
        enabled: bool,
    },
    AddSlot {
        service_type: ServiceType,
        day_of_week: u8,
    },
    RemoveSlot {
        service_type: ServiceType,
        day_of_week: u8,
        index: usize,
    },
    EditSlot {
        service_type: ServiceType,
        day_of_week: u8,
        index: usize,
        field: SlotField,
        value: String,
    },
    CopyToOthers {
        source: ServiceType,
        targets: Vec<ServiceType>,
    },
    /// Blanks every slot time of one service type. Does not restore the
    /// loaded values.
    ResetService { service_type: ServiceType },
}

pub fn apply(schedule: &WeeklySchedule, command: ScheduleCommand) -> Result<WeeklySchedule, CommandError> {
    let mut next = schedule.clone();

    match command {
        ScheduleCommand::ToggleDay {
            service_type,
            day_of_week,
            enabled,
        } => {
            let day = day_mut(&mut next, service_type, day_of_week)?;
            // Slots stay as they are so re-enabling brings them back.
            day.status = if enabled { DayStatus::Enabled } else { DayStatus::Disabled };
        }
        ScheduleCommand::AddSlot {
            service_type,
            day_of_week,
        } => {
            let day = day_mut(&mut next, service_type, day_of_week)?;
            if !day.is_enabled() {
                return Err(CommandError::DayDisabled {
                    service_type,
                    day_of_week,
                });
            }
            day.slots.push(TimeSlot::default());
        }
        ScheduleCommand::RemoveSlot {
            service_type,
            day_of_week,
            index,
        } => {
            let day = day_mut(&mut next, service_type, day_of_week)?;
            check_slot(day, index)?;
            if day.slots.len() <= 1 {
                return Err(CommandError::LastSlot {
                    service_type,
                    day_of_week,
                });
            }
            day.slots.remove(index);
        }
        ScheduleCommand::EditSlot {
            service_type,
            day_of_week,
            index,
            field,
            value,
        } => {
            let day = day_mut(&mut next, service_type, day_of_week)?;
            check_slot(day, index)?;
            day.slots[index].set(field, value);
        }
        ScheduleCommand::CopyToOthers { source, targets } => {
            if targets.contains(&source) {
                return Err(CommandError::SelfCopy(source));
            }
            next = copy_service_schedule(schedule, source, &targets);
        }
        ScheduleCommand::ResetService { service_type } => {
            for day in next.service_mut(service_type).days_mut() {
                for slot in day.slots.iter_mut() {
                    slot.start_time.clear();
                    slot.end_time.clear();
                }
            }
        }
    }

    Ok(next)
}

fn day_mut(
    schedule: &mut WeeklySchedule,
    service_type: ServiceType,
    day_of_week: u8,
) -> Result<&mut DaySchedule, CommandError> {
    schedule
        .service_mut(service_type)
        .day_mut(day_of_week)
        .ok_or(CommandError::UnknownDay(day_of_week))
}

fn check_slot(day: &DaySchedule, index: usize) -> Result<(), CommandError> {
    if index < day.slots.len() {
        Ok(())
    } else {
        Err(CommandError::SlotOutOfRange {
            service_type: day.service_type,
            day_of_week: day.day_of_week,
            index,
        })
    }
}
