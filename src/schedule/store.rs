use super::commands::{apply, ScheduleCommand};
use super::error::{FetchError, StoreError};
use super::model::{ServiceType, SlotField, WeeklySchedule};
use super::normalizer::{from_backend, to_backend};
use super::port::SchedulePort;
use super::validator;

/// Lifecycle of one editing session.
///
/// `Closed -> Loading -> Ready <-> Editing -> Validating -> Saving -> Closed`,
/// with `Validating` and `Saving` falling back to `Ready` on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorePhase {
    Closed,
    Loading,
    Ready,
    Editing,
    Validating,
    Saving,
}

/// How `load` obtained the schedule.
#[derive(Debug)]
pub enum LoadOutcome {
    Fetched,
    /// The fetch failed; the store holds an all-default schedule instead.
    Defaulted(FetchError),
}

/// Session-scoped owner of one restaurant's [`WeeklySchedule`].
///
/// Created when the editor opens and dropped when it closes. Dropping a
/// pending `load` or `save` future and calling [`ScheduleStore::close`] is how
/// a caller abandons an in-flight request; the store never sees the late
/// response.
pub struct ScheduleStore<P> {
    port: P,
    restaurant_id: i32,
    schedule: WeeklySchedule,
    original: Option<WeeklySchedule>,
    active_service: ServiceType,
    phase: StorePhase,
}

impl<P: SchedulePort> ScheduleStore<P> {
    pub fn new(port: P, restaurant_id: i32) -> Self {
        Self {
            port,
            restaurant_id,
            schedule: WeeklySchedule::default(),
            original: None,
            active_service: ServiceType::DineIn,
            phase: StorePhase::Closed,
        }
    }

    pub fn restaurant_id(&self) -> i32 {
        self.restaurant_id
    }

    pub fn phase(&self) -> StorePhase {
        self.phase
    }

    pub fn schedule(&self) -> &WeeklySchedule {
        &self.schedule
    }

    /// Schedule as it was when loaded (or last saved). Kept for reference
    /// only; `reset_active` does not restore from it.
    pub fn original(&self) -> Option<&WeeklySchedule> {
        self.original.as_ref()
    }

    pub fn active_service(&self) -> ServiceType {
        self.active_service
    }

    pub fn select_service(&mut self, service_type: ServiceType) {
        self.active_service = service_type;
    }

    pub fn is_loading(&self) -> bool {
        self.phase == StorePhase::Loading
    }

    pub fn is_saving(&self) -> bool {
        self.phase == StorePhase::Saving
    }

    pub fn is_valid(&self) -> bool {
        validator::is_valid(&self.schedule)
    }

    /// Opens the session and fetches the schedule. A failed fetch still
    /// leaves the store `Ready`, holding the default schedule.
    pub async fn load(&mut self) -> Result<LoadOutcome, StoreError> {
        if matches!(self.phase, StorePhase::Loading | StorePhase::Validating | StorePhase::Saving) {
            return Err(StoreError::Busy(self.phase));
        }

        self.phase = StorePhase::Loading;
        tracing::debug!(restaurant_id = self.restaurant_id, "Loading service hours");

        let outcome = match self.port.fetch_schedule(self.restaurant_id).await {
            Ok(records) => {
                tracing::info!(
                    restaurant_id = self.restaurant_id,
                    record_count = records.len(),
                    "Loaded service hours"
                );
                self.schedule = from_backend(&records);
                LoadOutcome::Fetched
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    restaurant_id = self.restaurant_id,
                    "Failed to load service hours, falling back to defaults"
                );
                self.schedule = WeeklySchedule::default();
                LoadOutcome::Defaulted(e)
            }
        };

        self.original = Some(self.schedule.clone());
        self.active_service = ServiceType::DineIn;
        self.phase = StorePhase::Ready;

        Ok(outcome)
    }

    /// Ends the session without saving. Unsaved edits are discarded.
    pub fn close(&mut self) {
        if self.phase == StorePhase::Closed {
            return;
        }
        tracing::debug!(restaurant_id = self.restaurant_id, phase = ?self.phase, "Closing service hours session");
        self.schedule = WeeklySchedule::default();
        self.original = None;
        self.phase = StorePhase::Closed;
    }

    pub fn apply(&mut self, command: ScheduleCommand) -> Result<(), StoreError> {
        match self.phase {
            StorePhase::Ready | StorePhase::Editing => {}
            StorePhase::Closed => return Err(StoreError::NotOpen),
            phase => return Err(StoreError::Busy(phase)),
        }

        self.schedule = apply(&self.schedule, command)?;
        self.phase = StorePhase::Editing;
        Ok(())
    }

    pub fn toggle_day(&mut self, service_type: ServiceType, day_of_week: u8, enabled: bool) -> Result<(), StoreError> {
        self.apply(ScheduleCommand::ToggleDay {
            service_type,
            day_of_week,
            enabled,
        })
    }

    pub fn add_slot(&mut self, service_type: ServiceType, day_of_week: u8) -> Result<(), StoreError> {
        self.apply(ScheduleCommand::AddSlot {
            service_type,
            day_of_week,
        })
    }

    pub fn remove_slot(&mut self, service_type: ServiceType, day_of_week: u8, index: usize) -> Result<(), StoreError> {
        self.apply(ScheduleCommand::RemoveSlot {
            service_type,
            day_of_week,
            index,
        })
    }

    pub fn edit_slot(
        &mut self,
        service_type: ServiceType,
        day_of_week: u8,
        index: usize,
        field: SlotField,
        value: impl Into<String>,
    ) -> Result<(), StoreError> {
        self.apply(ScheduleCommand::EditSlot {
            service_type,
            day_of_week,
            index,
            field,
            value: value.into(),
        })
    }

    pub fn copy_to_others(&mut self, source: ServiceType, targets: &[ServiceType]) -> Result<(), StoreError> {
        self.apply(ScheduleCommand::CopyToOthers {
            source,
            targets: targets.to_vec(),
        })?;
        tracing::info!(
            restaurant_id = self.restaurant_id,
            %source,
            targets = ?targets,
            "Copied service hours"
        );
        Ok(())
    }

    pub fn reset_active(&mut self, service_type: ServiceType) -> Result<(), StoreError> {
        self.apply(ScheduleCommand::ResetService { service_type })?;
        tracing::info!(restaurant_id = self.restaurant_id, %service_type, "Cleared service hours");
        Ok(())
    }

    /// Validates and submits the whole schedule. On success the session
    /// closes with the submitted schedule as the new baseline; on any failure
    /// the store returns to `Ready` with edits intact.
    pub async fn save(&mut self) -> Result<(), StoreError> {
        match self.phase {
            StorePhase::Ready | StorePhase::Editing => {}
            StorePhase::Closed => return Err(StoreError::NotOpen),
            phase => return Err(StoreError::Busy(phase)),
        }

        self.phase = StorePhase::Validating;
        if let Err(e) = validator::validate(&self.schedule) {
            tracing::warn!(
                restaurant_id = self.restaurant_id,
                incomplete = e.incomplete.len(),
                "Service hours incomplete, not saving"
            );
            self.phase = StorePhase::Ready;
            return Err(e.into());
        }

        self.phase = StorePhase::Saving;
        let records = to_backend(&self.schedule);
        let record_count = records.len();

        match self.port.replace_schedule(self.restaurant_id, records).await {
            Ok(()) => {
                tracing::info!(restaurant_id = self.restaurant_id, record_count, "Saved service hours");
                self.original = Some(self.schedule.clone());
                self.phase = StorePhase::Closed;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, restaurant_id = self.restaurant_id, "Failed to save service hours");
                self.phase = StorePhase::Ready;
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayScheduleRecord, SlotRecord};
    use crate::schedule::error::{CommandError, SaveError};
    use crate::schedule::model::{DayStatus, TimeSlot};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct FakePort {
        records: Vec<DayScheduleRecord>,
        fail_fetch: bool,
        reject_save: Option<Option<String>>,
        saved: Mutex<Vec<(i32, Vec<DayScheduleRecord>)>>,
    }

    #[async_trait]
    impl SchedulePort for FakePort {
        async fn fetch_schedule(&self, _restaurant_id: i32) -> Result<Vec<DayScheduleRecord>, FetchError> {
            if self.fail_fetch {
                return Err(FetchError::new("connection refused"));
            }
            Ok(self.records.clone())
        }

        async fn replace_schedule(&self, restaurant_id: i32, records: Vec<DayScheduleRecord>) -> Result<(), SaveError> {
            if let Some(message) = &self.reject_save {
                return Err(SaveError::new(message.clone()));
            }
            self.saved.lock().unwrap().push((restaurant_id, records));
            Ok(())
        }
    }

    fn delivery_sunday() -> DayScheduleRecord {
        DayScheduleRecord {
            id: Some(11),
            day_of_week: 1,
            status: 1,
            order_type_id: 3,
            slots: vec![SlotRecord {
                id: Some(110),
                start_time: "09:00".to_string(),
                end_time: "17:00".to_string(),
            }],
        }
    }

    async fn open(port: FakePort) -> (Arc<FakePort>, ScheduleStore<Arc<FakePort>>) {
        let port = Arc::new(port);
        let mut store = ScheduleStore::new(port.clone(), 5);
        store.load().await.unwrap();
        (port, store)
    }

    #[tokio::test]
    async fn test_load_single_record_fills_defaults() {
        let (_, store) = open(FakePort {
            records: vec![delivery_sunday()],
            ..Default::default()
        })
        .await;

        assert_eq!(store.phase(), StorePhase::Ready);
        assert_eq!(store.schedule().day_count(), 21);
        assert_eq!(
            store.schedule().day(ServiceType::Delivery, 1).unwrap().slots,
            vec![TimeSlot {
                id: Some(110),
                start_time: "09:00".to_string(),
                end_time: "17:00".to_string(),
            }]
        );
        assert_eq!(
            store.schedule().day(ServiceType::Delivery, 2).unwrap().slots,
            vec![TimeSlot::new("10:00", "23:00")]
        );
        assert_eq!(store.original(), Some(store.schedule()));
    }

    #[tokio::test]
    async fn test_load_failure_falls_back_to_defaults() {
        let mut store = ScheduleStore::new(
            FakePort {
                fail_fetch: true,
                ..Default::default()
            },
            5,
        );

        let outcome = store.load().await.unwrap();
        assert!(matches!(outcome, LoadOutcome::Defaulted(_)));
        assert_eq!(store.phase(), StorePhase::Ready);
        assert_eq!(*store.schedule(), WeeklySchedule::default());
        assert!(store.is_valid());
    }

    #[tokio::test]
    async fn test_commands_require_open_session() {
        let mut store = ScheduleStore::new(FakePort::default(), 5);
        assert!(matches!(
            store.toggle_day(ServiceType::DineIn, 1, false),
            Err(StoreError::NotOpen)
        ));
        assert!(matches!(store.save().await, Err(StoreError::NotOpen)));
    }

    #[tokio::test]
    async fn test_disabled_day_with_empty_slots_is_valid() {
        let (_, mut store) = open(FakePort::default()).await;

        store.toggle_day(ServiceType::Takeaway, 2, false).unwrap();
        store
            .edit_slot(ServiceType::Takeaway, 2, 0, SlotField::StartTime, "")
            .unwrap();
        store.edit_slot(ServiceType::Takeaway, 2, 0, SlotField::EndTime, "").unwrap();

        assert_eq!(store.phase(), StorePhase::Editing);
        assert!(store.is_valid());

        store.toggle_day(ServiceType::Takeaway, 2, true).unwrap();
        assert!(!store.is_valid());
    }

    #[tokio::test]
    async fn test_copy_to_others_strips_ids() {
        let mut dine_in_tuesday = delivery_sunday();
        dine_in_tuesday.order_type_id = 1;
        dine_in_tuesday.day_of_week = 3;
        dine_in_tuesday.slots.push(SlotRecord {
            id: Some(111),
            start_time: "18:00".to_string(),
            end_time: "22:00".to_string(),
        });

        let (_, mut store) = open(FakePort {
            records: vec![dine_in_tuesday],
            ..Default::default()
        })
        .await;

        store
            .copy_to_others(ServiceType::DineIn, &[ServiceType::Takeaway, ServiceType::Delivery])
            .unwrap();

        for target in [ServiceType::Takeaway, ServiceType::Delivery] {
            let tuesday = store.schedule().day(target, 3).unwrap();
            assert!(tuesday.id.is_none());
            assert_eq!(
                tuesday.slots,
                vec![TimeSlot::new("09:00", "17:00"), TimeSlot::new("18:00", "22:00")]
            );
        }
        assert_eq!(store.schedule().day(ServiceType::DineIn, 3).unwrap().id, Some(11));

        assert!(matches!(
            store.copy_to_others(ServiceType::DineIn, &[ServiceType::DineIn]),
            Err(StoreError::Command(CommandError::SelfCopy(ServiceType::DineIn)))
        ));
    }

    #[tokio::test]
    async fn test_reset_active_clears_instead_of_restoring() {
        let (_, mut store) = open(FakePort {
            records: vec![DayScheduleRecord {
                id: Some(3),
                day_of_week: 4,
                status: 1,
                order_type_id: 1,
                slots: vec![SlotRecord {
                    id: Some(30),
                    start_time: "11:00".to_string(),
                    end_time: "22:00".to_string(),
                }],
            }],
            ..Default::default()
        })
        .await;

        store.reset_active(ServiceType::DineIn).unwrap();

        let wednesday = store.schedule().day(ServiceType::DineIn, 4).unwrap();
        assert_eq!(wednesday.slots[0].start_time, "");
        assert_eq!(wednesday.slots[0].end_time, "");
        assert_eq!(wednesday.slots[0].id, Some(30));
        assert!(!store.is_valid());

        let original = store.original().unwrap().day(ServiceType::DineIn, 4).unwrap();
        assert_eq!(original.slots[0].start_time, "11:00");

        store
            .edit_slot(ServiceType::DineIn, 4, 0, SlotField::StartTime, "11:00")
            .unwrap();
        store.edit_slot(ServiceType::DineIn, 4, 0, SlotField::EndTime, "22:00").unwrap();
        // every other dine-in day is still blank
        assert!(!store.is_valid());
    }

    #[tokio::test]
    async fn test_remove_last_slot_is_refused() {
        let (_, mut store) = open(FakePort::default()).await;

        assert!(matches!(
            store.remove_slot(ServiceType::Delivery, 5, 0),
            Err(StoreError::Command(CommandError::LastSlot { .. }))
        ));
        assert_eq!(store.schedule().day(ServiceType::Delivery, 5).unwrap().slots.len(), 1);

        store.add_slot(ServiceType::Delivery, 5).unwrap();
        store.remove_slot(ServiceType::Delivery, 5, 1).unwrap();
        assert_eq!(store.schedule().day(ServiceType::Delivery, 5).unwrap().slots.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_save_is_not_submitted() {
        let (port, mut store) = open(FakePort::default()).await;
        store.edit_slot(ServiceType::DineIn, 2, 0, SlotField::EndTime, " ").unwrap();

        let err = store.save().await.unwrap_err();
        match err {
            StoreError::Validation(e) => {
                assert_eq!(e.incomplete.len(), 1);
                assert_eq!(e.incomplete[0].service_type, ServiceType::DineIn);
                assert_eq!(e.incomplete[0].day_of_week, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.phase(), StorePhase::Ready);
        assert!(port.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_successful_save_submits_full_schedule_and_closes() {
        let (port, mut store) = open(FakePort {
            records: vec![delivery_sunday()],
            ..Default::default()
        })
        .await;
        store.toggle_day(ServiceType::DineIn, 7, false).unwrap();

        store.save().await.unwrap();

        assert_eq!(store.phase(), StorePhase::Closed);
        assert_eq!(store.original(), Some(store.schedule()));

        let saved = port.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        let (restaurant_id, records) = &saved[0];
        assert_eq!(*restaurant_id, 5);
        assert_eq!(records.len(), 21);
        assert_eq!(records[6].status, 0);
        assert!(records.contains(&delivery_sunday()));
    }

    #[tokio::test]
    async fn test_failed_save_keeps_edits_for_retry() {
        let (_, mut store) = open(FakePort {
            reject_save: Some(Some("restaurant is locked".to_string())),
            ..Default::default()
        })
        .await;
        store
            .edit_slot(ServiceType::Takeaway, 3, 0, SlotField::StartTime, "08:30")
            .unwrap();
        let edited = store.schedule().clone();

        let err = store.save().await.unwrap_err();
        match err {
            StoreError::Save(e) => assert_eq!(e.message.as_deref(), Some("restaurant is locked")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.phase(), StorePhase::Ready);
        assert_eq!(*store.schedule(), edited);
        assert_eq!(
            store.original().unwrap().day(ServiceType::Takeaway, 3).unwrap().slots[0].start_time,
            "10:00"
        );
    }

    #[tokio::test]
    async fn test_close_discards_edits() {
        let (_, mut store) = open(FakePort::default()).await;
        store.toggle_day(ServiceType::Delivery, 1, false).unwrap();

        store.close();

        assert_eq!(store.phase(), StorePhase::Closed);
        assert_eq!(*store.schedule(), WeeklySchedule::default());
        assert!(store.original().is_none());
        assert_eq!(
            store.schedule().day(ServiceType::Delivery, 1).unwrap().status,
            DayStatus::Enabled
        );
    }

    #[tokio::test]
    async fn test_dropped_save_leaves_store_busy_until_closed() {
        let (_, mut store) = open(FakePort::default()).await;
        store.select_service(ServiceType::Takeaway);
        assert_eq!(store.active_service(), ServiceType::Takeaway);

        // The fake completes on first poll, so stand in for an abandoned request.
        store.phase = StorePhase::Saving;
        assert!(store.is_saving());
        assert!(matches!(
            store.add_slot(ServiceType::DineIn, 1),
            Err(StoreError::Busy(StorePhase::Saving))
        ));
        assert!(matches!(store.load().await, Err(StoreError::Busy(StorePhase::Saving))));

        store.close();
        store.load().await.unwrap();
        assert_eq!(store.phase(), StorePhase::Ready);
        assert_eq!(store.active_service(), ServiceType::DineIn);
    }
}
