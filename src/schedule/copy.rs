use super::model::{DaySchedule, ServiceSchedule, ServiceType, TimeSlot, WeeklySchedule};

/// Replaces each target's service schedule with the source's days, stripped
/// of ids so the copies are created as new rows on save.
///
/// The caller keeps `source` out of `targets`; if it slips in, the source is
/// rewritten with id-less copies of itself.
pub fn copy_service_schedule(
    schedule: &WeeklySchedule,
    source: ServiceType,
    targets: &[ServiceType],
) -> WeeklySchedule {
    let mut copied = schedule.clone();
    let from = schedule.service(source);

    for &target in targets {
        let days = from.days().iter().map(|day| DaySchedule {
            id: None,
            day_of_week: day.day_of_week,
            status: day.status,
            slots: day
                .slots
                .iter()
                .map(|slot| TimeSlot {
                    id: None,
                    start_time: slot.start_time.clone(),
                    end_time: slot.end_time.clone(),
                })
                .collect(),
            service_type: target,
        });
        copied.replace(ServiceSchedule::from_days(target, days));
    }

    copied
}
