use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;

use crate::{
    models::{DayScheduleRecord, SlotRecord},
    schedule::{FetchError, SaveError, SchedulePort},
};

#[derive(Debug, Clone, FromRow)]
struct DayRow {
    id: i32,
    day_of_week: i16,
    status: i16,
    order_type_id: i16,
}

#[derive(Debug, Clone, FromRow)]
struct SlotRow {
    id: i32,
    service_hour_id: i32,
    start_time: String,
    end_time: String,
}

/// Postgres-backed store for the `"ServiceHours"` / `"ServiceHourSlots"` tables.
#[derive(Clone)]
pub struct PgScheduleRepository {
    pool: PgPool,
}

impl PgScheduleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All day rows of a restaurant with their slots, in order type / day order.
    pub async fn fetch(&self, restaurant_id: i32) -> Result<Vec<DayScheduleRecord>, sqlx::Error> {
        let days = sqlx::query_as::<_, DayRow>(
            r#"
            SELECT id, day_of_week, status, order_type_id
            FROM "ServiceHours"
            WHERE restaurant_id = $1
            ORDER BY order_type_id, day_of_week
            "#,
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;

        let slots = sqlx::query_as::<_, SlotRow>(
            r#"
            SELECT s.id, s.service_hour_id, s.start_time, s.end_time
            FROM "ServiceHourSlots" s
            INNER JOIN "ServiceHours" h ON s.service_hour_id = h.id
            WHERE h.restaurant_id = $1
            ORDER BY s.service_hour_id, s.position, s.id
            "#,
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(restaurant_id, days = days.len(), slots = slots.len(), "Fetched service hours rows");

        Ok(assemble_records(days, slots))
    }

    /// Makes `records` the complete set of service hours for the restaurant.
    ///
    /// Day rows are matched on (restaurant, order type, day), so a record
    /// without an id still updates the existing row for that pair. Slots whose
    /// id belongs to that day are updated in place, the rest are inserted, and
    /// anything not submitted is deleted. A slot id repeated within one day
    /// updates once and inserts the rest. Runs in one transaction.
    pub async fn replace(&self, restaurant_id: i32, records: &[DayScheduleRecord]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let mut kept_days: Vec<i32> = Vec::with_capacity(records.len());

        for record in records {
            let day_id: i32 = sqlx::query_scalar(
                r#"
                INSERT INTO "ServiceHours" (restaurant_id, order_type_id, day_of_week, status)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (restaurant_id, order_type_id, day_of_week)
                DO UPDATE SET status = EXCLUDED.status, updated_at = NOW()
                RETURNING id
                "#,
            )
            .bind(restaurant_id)
            .bind(record.order_type_id)
            .bind(record.day_of_week)
            .bind(record.status)
            .fetch_one(&mut *tx)
            .await?;
            kept_days.push(day_id);

            let mut kept_slots: Vec<i32> = Vec::with_capacity(record.slots.len());
            for (position, slot) in record.slots.iter().enumerate() {
                let position = i16::try_from(position).unwrap_or(i16::MAX);

                // An id already claimed earlier in this day is inserted as a new slot
                let updated: Option<i32> = match slot.id {
                    Some(slot_id) if !kept_slots.contains(&slot_id) => {
                        sqlx::query_scalar(
                            r#"
                            UPDATE "ServiceHourSlots"
                            SET start_time = $1, end_time = $2, position = $3
                            WHERE id = $4 AND service_hour_id = $5
                            RETURNING id
                            "#,
                        )
                        .bind(&slot.start_time)
                        .bind(&slot.end_time)
                        .bind(position)
                        .bind(slot_id)
                        .bind(day_id)
                        .fetch_optional(&mut *tx)
                        .await?
                    }
                    _ => None,
                };

                let slot_id = match updated {
                    Some(id) => id,
                    None => {
                        sqlx::query_scalar(
                            r#"
                            INSERT INTO "ServiceHourSlots" (service_hour_id, position, start_time, end_time)
                            VALUES ($1, $2, $3, $4)
                            RETURNING id
                            "#,
                        )
                        .bind(day_id)
                        .bind(position)
                        .bind(&slot.start_time)
                        .bind(&slot.end_time)
                        .fetch_one(&mut *tx)
                        .await?
                    }
                };
                kept_slots.push(slot_id);
            }

            sqlx::query(r#"DELETE FROM "ServiceHourSlots" WHERE service_hour_id = $1 AND NOT (id = ANY($2))"#)
                .bind(day_id)
                .bind(kept_slots.as_slice())
                .execute(&mut *tx)
                .await?;
        }

        let removed = sqlx::query(r#"DELETE FROM "ServiceHours" WHERE restaurant_id = $1 AND NOT (id = ANY($2))"#)
            .bind(restaurant_id)
            .bind(kept_days.as_slice())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await.map_err(|e| {
            tracing::error!(error = %e, restaurant_id, "Transaction rollback in replace service hours");
            e
        })?;

        tracing::info!(
            restaurant_id,
            days = kept_days.len(),
            removed_days = removed,
            "Replaced service hours"
        );

        Ok(())
    }
}

#[async_trait]
impl SchedulePort for PgScheduleRepository {
    async fn fetch_schedule(&self, restaurant_id: i32) -> Result<Vec<DayScheduleRecord>, FetchError> {
        self.fetch(restaurant_id).await.map_err(|e| {
            tracing::error!(error = %e, restaurant_id, "Failed to fetch service hours");
            FetchError::new(e.to_string())
        })
    }

    async fn replace_schedule(&self, restaurant_id: i32, records: Vec<DayScheduleRecord>) -> Result<(), SaveError> {
        self.replace(restaurant_id, &records).await.map_err(|e| {
            tracing::error!(error = %e, restaurant_id, "Failed to replace service hours");
            SaveError::new(Some(e.to_string()))
        })
    }
}

fn assemble_records(days: Vec<DayRow>, slots: Vec<SlotRow>) -> Vec<DayScheduleRecord> {
    let mut slots_by_day: HashMap<i32, Vec<SlotRecord>> = HashMap::new();
    for slot in slots {
        slots_by_day.entry(slot.service_hour_id).or_default().push(SlotRecord {
            id: Some(slot.id),
            start_time: slot.start_time,
            end_time: slot.end_time,
        });
    }

    days.into_iter()
        .map(|day| DayScheduleRecord {
            id: Some(day.id),
            day_of_week: day.day_of_week,
            status: day.status,
            order_type_id: day.order_type_id,
            slots: slots_by_day.remove(&day.id).unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(id: i32, service_hour_id: i32, start: &str, end: &str) -> SlotRow {
        SlotRow {
            id,
            service_hour_id,
            start_time: start.to_string(),
            end_time: end.to_string(),
        }
    }

    #[test]
    fn test_assemble_groups_slots_under_their_day() {
        let days = vec![
            DayRow {
                id: 1,
                day_of_week: 1,
                status: 1,
                order_type_id: 1,
            },
            DayRow {
                id: 2,
                day_of_week: 2,
                status: 0,
                order_type_id: 1,
            },
        ];
        let slots = vec![
            slot(10, 1, "09:00", "12:00"),
            slot(11, 1, "13:00", "18:00"),
            slot(20, 99, "00:00", "01:00"),
        ];

        let records = assemble_records(days, slots);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, Some(1));
        assert_eq!(
            records[0].slots.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![Some(10), Some(11)]
        );
        assert_eq!(records[0].slots[1].start_time, "13:00");
        assert_eq!(records[1].status, 0);
        assert!(records[1].slots.is_empty());
    }

    mod live {
        use super::super::*;
        use crate::db::{create_pool, run_migrations};
        use crate::schedule::{
            apply, copy_service_schedule, from_backend, to_backend, ScheduleCommand, ServiceType, SlotField,
            WeeklySchedule,
        };

        async fn repository() -> PgScheduleRepository {
            let url = std::env::var("DATABASE_URL").unwrap();
            let pool = create_pool(&url).await.unwrap();
            run_migrations(&pool).await.unwrap();
            PgScheduleRepository::new(pool)
        }

        // Each test writes under its own restaurant so runs never collide
        fn fresh_restaurant_id() -> i32 {
            i32::try_from(uuid::Uuid::new_v4().as_u128() % 1_000_000_000).unwrap() + 1
        }

        fn day_record(order_type_id: i16, day_of_week: i16, start: &str, end: &str) -> DayScheduleRecord {
            DayScheduleRecord {
                id: None,
                day_of_week,
                status: 1,
                order_type_id,
                slots: vec![SlotRecord {
                    id: None,
                    start_time: start.to_string(),
                    end_time: end.to_string(),
                }],
            }
        }

        fn find(records: &[DayScheduleRecord], order_type_id: i16, day_of_week: i16) -> &DayScheduleRecord {
            records
                .iter()
                .find(|r| r.order_type_id == order_type_id && r.day_of_week == day_of_week)
                .unwrap()
        }

        #[tokio::test]
        #[ignore] // Needs DATABASE_URL pointing at a disposable Postgres
        async fn test_copied_schedule_updates_existing_day_rows() {
            let repo = repository().await;
            let restaurant_id = fresh_restaurant_id();

            repo.replace(restaurant_id, &to_backend(&WeeklySchedule::default()))
                .await
                .unwrap();
            let before = repo.fetch(restaurant_id).await.unwrap();
            assert_eq!(before.len(), 21);

            let loaded = from_backend(&before);
            let edited = apply(
                &loaded,
                ScheduleCommand::EditSlot {
                    service_type: ServiceType::DineIn,
                    day_of_week: 2,
                    index: 0,
                    field: SlotField::StartTime,
                    value: "08:00".to_string(),
                },
            )
            .unwrap();
            let copied = copy_service_schedule(&edited, ServiceType::DineIn, &[ServiceType::Takeaway]);

            // Takeaway rows carry no ids now; they must land on the existing rows
            repo.replace(restaurant_id, &to_backend(&copied)).await.unwrap();
            let after = repo.fetch(restaurant_id).await.unwrap();

            assert_eq!(after.len(), 21);
            let takeaway_monday = find(&after, 2, 2);
            assert_eq!(takeaway_monday.id, find(&before, 2, 2).id);
            assert_eq!(takeaway_monday.slots.len(), 1);
            assert_eq!(takeaway_monday.slots[0].start_time, "08:00");
            assert_ne!(takeaway_monday.slots[0].id, find(&before, 2, 2).slots[0].id);
            assert_eq!(find(&after, 1, 2).slots[0].id, find(&before, 1, 2).slots[0].id);
        }

        #[tokio::test]
        #[ignore] // Needs DATABASE_URL pointing at a disposable Postgres
        async fn test_slot_id_from_another_day_is_inserted_fresh() {
            let repo = repository().await;
            let restaurant_id = fresh_restaurant_id();

            repo.replace(
                restaurant_id,
                &[day_record(1, 1, "09:00", "12:00"), day_record(1, 2, "13:00", "17:00")],
            )
            .await
            .unwrap();
            let before = repo.fetch(restaurant_id).await.unwrap();
            let sunday_slot = find(&before, 1, 1).slots[0].id;
            let monday_slot = find(&before, 1, 2).slots[0].id;

            let mut submission = before.clone();
            let monday = submission.iter_mut().find(|r| r.day_of_week == 2).unwrap();
            monday.slots[0].id = sunday_slot;
            monday.slots[0].start_time = "14:00".to_string();

            repo.replace(restaurant_id, &submission).await.unwrap();
            let after = repo.fetch(restaurant_id).await.unwrap();

            let sunday = find(&after, 1, 1);
            assert_eq!(sunday.slots.len(), 1);
            assert_eq!(sunday.slots[0].id, sunday_slot);
            assert_eq!(sunday.slots[0].start_time, "09:00");

            let monday = find(&after, 1, 2);
            assert_eq!(monday.slots.len(), 1);
            assert_eq!(monday.slots[0].start_time, "14:00");
            assert_ne!(monday.slots[0].id, sunday_slot);
            assert_ne!(monday.slots[0].id, monday_slot);
        }

        #[tokio::test]
        #[ignore] // Needs DATABASE_URL pointing at a disposable Postgres
        async fn test_partial_submission_prunes_days_and_slots() {
            let repo = repository().await;
            let restaurant_id = fresh_restaurant_id();

            repo.replace(restaurant_id, &to_backend(&WeeklySchedule::default()))
                .await
                .unwrap();
            let before = repo.fetch(restaurant_id).await.unwrap();

            let mut kept = find(&before, 3, 6).clone();
            kept.slots.push(SlotRecord {
                id: None,
                start_time: "18:00".to_string(),
                end_time: "22:00".to_string(),
            });
            repo.replace(restaurant_id, &[kept, day_record(1, 7, "11:00", "15:00")])
                .await
                .unwrap();
            let after = repo.fetch(restaurant_id).await.unwrap();

            assert_eq!(after.len(), 2);
            assert_eq!(find(&after, 3, 6).id, find(&before, 3, 6).id);
            assert_eq!(find(&after, 3, 6).slots.len(), 2);
            assert_eq!(find(&after, 3, 6).slots[1].start_time, "18:00");

            // Dropping a slot from a kept day deletes its row
            let mut trimmed = after.clone();
            trimmed.iter_mut().for_each(|r| r.slots.truncate(1));
            repo.replace(restaurant_id, &trimmed).await.unwrap();
            assert_eq!(find(&repo.fetch(restaurant_id).await.unwrap(), 3, 6).slots.len(), 1);
        }

        #[tokio::test]
        #[ignore] // Needs DATABASE_URL pointing at a disposable Postgres
        async fn test_repeated_slot_id_keeps_every_submitted_slot() {
            let repo = repository().await;
            let restaurant_id = fresh_restaurant_id();

            repo.replace(restaurant_id, &[day_record(2, 3, "10:00", "14:00")])
                .await
                .unwrap();
            let mut submission = repo.fetch(restaurant_id).await.unwrap();
            let existing = submission[0].slots[0].clone();
            submission[0].slots.push(SlotRecord {
                id: existing.id,
                start_time: "17:00".to_string(),
                end_time: "21:00".to_string(),
            });

            repo.replace(restaurant_id, &submission).await.unwrap();
            let after = repo.fetch(restaurant_id).await.unwrap();

            let slots = &after[0].slots;
            assert_eq!(slots.len(), 2);
            assert_eq!(slots[0].id, existing.id);
            assert_eq!(slots[0].start_time, "10:00");
            assert_eq!(slots[1].start_time, "17:00");
            assert_ne!(slots[1].id, existing.id);
        }
    }
}
