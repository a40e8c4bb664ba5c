use axum::{
    extract::{Path, State},
    Json,
};
use metrics::counter;
use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    models::{DayScheduleRecord, ServiceHoursMutationResponse, WeeklyScheduleResponse},
    schedule::{from_backend, from_submission, validate, ServiceType},
    AppError, AppResult, AppState,
};

/// GET /api/restaurants/{restaurant_id}/service-hours
#[utoipa::path(
    get,
    path = "/api/restaurants/{restaurant_id}/service-hours",
    params(
        ("restaurant_id" = i32, Path, description = "Restaurant ID")
    ),
    responses(
        (status = 200, description = "Stored service-hours records", body = Vec<DayScheduleRecord>)
    ),
    tag = "service-hours"
)]
pub async fn get_service_hours(
    State(state): State<Arc<AppState>>,
    Path(restaurant_id): Path<i32>,
) -> AppResult<Json<Vec<DayScheduleRecord>>> {
    let records = state.schedules.fetch(restaurant_id).await?;
    Ok(Json(records))
}

/// GET /api/restaurants/{restaurant_id}/service-hours/weekly
#[utoipa::path(
    get,
    path = "/api/restaurants/{restaurant_id}/service-hours/weekly",
    params(
        ("restaurant_id" = i32, Path, description = "Restaurant ID")
    ),
    responses(
        (status = 200, description = "Full week per service type, defaults filled in", body = WeeklyScheduleResponse)
    ),
    tag = "service-hours"
)]
pub async fn get_weekly_schedule(
    State(state): State<Arc<AppState>>,
    Path(restaurant_id): Path<i32>,
) -> AppResult<Json<WeeklyScheduleResponse>> {
    let records = state.schedules.fetch(restaurant_id).await?;
    let schedule = from_backend(&records);

    Ok(Json(WeeklyScheduleResponse {
        restaurant_id,
        timezone: state.config.timezone.clone(),
        dine_in: schedule.service(ServiceType::DineIn).clone(),
        takeaway: schedule.service(ServiceType::Takeaway).clone(),
        delivery: schedule.service(ServiceType::Delivery).clone(),
    }))
}

/// PUT /api/restaurants/{restaurant_id}/service-hours - Replace all service hours
#[utoipa::path(
    put,
    path = "/api/restaurants/{restaurant_id}/service-hours",
    params(
        ("restaurant_id" = i32, Path, description = "Restaurant ID")
    ),
    request_body = Vec<DayScheduleRecord>,
    responses(
        (status = 200, description = "Service hours replaced", body = ServiceHoursMutationResponse),
        (status = 400, description = "Unknown order type or status, day out of range, duplicate day or slot id"),
        (status = 401, description = "Missing or wrong X-Api-Key"),
        (status = 422, description = "An enabled day has a blank slot time")
    ),
    tag = "service-hours",
    security(("api_key" = []))
)]
pub async fn replace_service_hours(
    State(state): State<Arc<AppState>>,
    Path(restaurant_id): Path<i32>,
    Json(records): Json<Vec<DayScheduleRecord>>,
) -> AppResult<Json<ServiceHoursMutationResponse>> {
    if let Err(e) = check_records(&records) {
        counter!("service_hours_replacements_total", "outcome" => "rejected").increment(1);
        tracing::warn!(restaurant_id, error = %e, "Rejected service hours submission");
        return Err(e);
    }

    if let Err(e) = validate(&from_submission(&records)) {
        counter!("service_hours_replacements_total", "outcome" => "incomplete").increment(1);
        tracing::warn!(restaurant_id, incomplete = e.incomplete.len(), "Incomplete service hours submission");
        return Err(e.into());
    }

    state.schedules.replace(restaurant_id, &records).await.map_err(|e| {
        counter!("service_hours_replacements_total", "outcome" => "failed").increment(1);
        AppError::from(e)
    })?;

    counter!("service_hours_replacements_total", "outcome" => "saved").increment(1);

    Ok(Json(ServiceHoursMutationResponse {
        success: true,
        message: Some("Service hours saved successfully".to_string()),
    }))
}

/// Shape checks the schedule model cannot express once records are grouped.
fn check_records(records: &[DayScheduleRecord]) -> AppResult<()> {
    let mut seen = HashSet::new();

    for record in records {
        let service_type = ServiceType::from_order_type_id(record.order_type_id).ok_or_else(|| {
            AppError::BadRequest(format!("Unknown order_type_id {}", record.order_type_id))
        })?;

        if !(1..=7).contains(&record.day_of_week) {
            return Err(AppError::BadRequest(format!(
                "day_of_week {} is outside 1..7",
                record.day_of_week
            )));
        }

        if !matches!(record.status, 0 | 1) {
            return Err(AppError::BadRequest(format!(
                "status {} must be 0 or 1",
                record.status
            )));
        }

        if !seen.insert((service_type, record.day_of_week)) {
            return Err(AppError::BadRequest(format!(
                "Duplicate {} record for day {}",
                service_type, record.day_of_week
            )));
        }

        let mut slot_ids = HashSet::new();
        if let Some(slot_id) = record.slots.iter().filter_map(|slot| slot.id).find(|id| !slot_ids.insert(*id)) {
            return Err(AppError::BadRequest(format!(
                "Slot id {} appears twice on {} day {}",
                slot_id, service_type, record.day_of_week
            )));
        }
    }

    Ok(())
}
