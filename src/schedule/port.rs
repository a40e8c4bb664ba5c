use async_trait::async_trait;
use std::sync::Arc;

use super::error::{FetchError, SaveError};
use crate::models::DayScheduleRecord;

/// Persistence collaborator for a restaurant's service hours.
///
/// `replace_schedule` has full-replace semantics: the submitted records are
/// the complete set for the restaurant afterwards.
#[async_trait]
pub trait SchedulePort: Send + Sync {
    async fn fetch_schedule(&self, restaurant_id: i32) -> Result<Vec<DayScheduleRecord>, FetchError>;

    async fn replace_schedule(&self, restaurant_id: i32, records: Vec<DayScheduleRecord>) -> Result<(), SaveError>;
}

#[async_trait]
impl<P: SchedulePort + ?Sized> SchedulePort for Arc<P> {
    async fn fetch_schedule(&self, restaurant_id: i32) -> Result<Vec<DayScheduleRecord>, FetchError> {
        (**self).fetch_schedule(restaurant_id).await
    }

    async fn replace_schedule(&self, restaurant_id: i32, records: Vec<DayScheduleRecord>) -> Result<(), SaveError> {
        (**self).replace_schedule(restaurant_id, records).await
    }
}
