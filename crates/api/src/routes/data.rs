use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use plan_core::ScheduleStore;
use serde::Deserialize;
use types::{ScheduleRow, StudentId, SubjectTeacher, TeacherOffSlot, WeekKey, WeekSlot};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct AvailabilityIn {
    pub week: WeekKey,
    pub slots: Vec<WeekSlot>,
}

#[derive(Deserialize, ToSchema)]
pub struct OffSlotsIn {
    pub week: WeekKey,
    pub slots: Vec<TeacherOffSlot>,
}

#[derive(Deserialize, ToSchema)]
pub struct BindingsIn {
    pub bindings: Vec<SubjectTeacher>,
}

#[derive(Deserialize)]
pub struct WeekQuery {
    pub week: WeekKey,
}

fn check_week(week: &WeekKey) -> Result<(), ApiError> {
    if week.is_valid_format() {
        Ok(())
    } else {
        Err(ApiError(format!("week key has invalid format: {week}")))
    }
}

fn check_slots<'a>(slots: impl Iterator<Item = &'a WeekSlot>) -> Result<(), ApiError> {
    for ws in slots {
        if !ws.slot.is_valid() {
            return Err(ApiError(format!("slot out of range: {}", ws.slot)));
        }
    }
    Ok(())
}

#[utoipa::path(
    put,
    path = "/v1/students/{id}/availability",
    params(("id" = String, Path, description = "Student ID")),
    request_body = AvailabilityIn,
    responses((status = 200, description = "Availability replaced"))
)]
pub async fn put_availability(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AvailabilityIn>,
) -> Result<Json<serde_json::Value>, ApiError> {
    check_week(&body.week)?;
    check_slots(body.slots.iter())?;
    let student = StudentId(id);
    state
        .store
        .set_availability(&student, &body.week, body.slots);
    Ok(Json(serde_json::json!({"ok": true})))
}

#[utoipa::path(
    put,
    path = "/v1/teachers/off-slots",
    request_body = OffSlotsIn,
    responses((status = 200, description = "Off-slots replaced"))
)]
pub async fn put_off_slots(
    State(state): State<AppState>,
    Json(body): Json<OffSlotsIn>,
) -> Result<Json<serde_json::Value>, ApiError> {
    check_week(&body.week)?;
    for off in &body.slots {
        if !off.slot.is_valid() {
            return Err(ApiError(format!("slot out of range: {}", off.slot)));
        }
    }
    state.store.set_off_slots(&body.week, body.slots);
    Ok(Json(serde_json::json!({"ok": true})))
}

#[utoipa::path(
    put,
    path = "/v1/students/{id}/subject-teachers",
    params(("id" = String, Path, description = "Student ID")),
    request_body = BindingsIn,
    responses((status = 200, description = "Subject-teacher bindings replaced"))
)]
pub async fn put_subject_teachers(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<BindingsIn>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let student = StudentId(id);
    state.store.set_subject_teachers(&student, body.bindings);
    Ok(Json(serde_json::json!({"ok": true})))
}

#[utoipa::path(
    get,
    path = "/v1/students/{id}/schedule",
    params(
        ("id" = String, Path, description = "Student ID"),
        ("week" = String, Query, description = "Week key (Monday, YYYY-MM-DD)")
    ),
    responses((status = 200, description = "Current schedule rows", body = [ScheduleRow]))
)]
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(q): Query<WeekQuery>,
) -> Result<Json<Vec<ScheduleRow>>, ApiError> {
    check_week(&q.week)?;
    let student = StudentId(id);
    let rows = state.store.week_schedule(&student, &q.week).await?;
    Ok(Json(rows))
}
