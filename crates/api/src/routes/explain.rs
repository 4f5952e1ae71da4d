use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use solver_backtrack::{expand_arrangements, group_runs, resolve_available};
use types::{DayOfWeek, GenerateRequest, TimeSlot, WeekSlot};
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct ExplainOut {
    pub resolved_slots: Vec<WeekSlot>,
    pub runs: Vec<RunOut>,
    pub chunks: Vec<ChunkOut>,
    pub required_slots: usize,
    pub available_slots: usize,
    pub feasible_supply: bool,
}

#[derive(Serialize, ToSchema)]
pub struct RunOut {
    pub day: DayOfWeek,
    pub slots: Vec<TimeSlot>,
}

#[derive(Serialize, ToSchema)]
pub struct ChunkOut {
    pub subject: String,
    pub size: u8,
}

/// Operator diagnostics: how the week resolves, how demand expands, and
/// whether supply can cover it — without running the search.
#[utoipa::path(
    post,
    path = "/v1/explain",
    request_body = GenerateRequest,
    responses(
    (status = 200, description = "Availability and demand breakdown", body = ExplainOut)
    )
)]
pub async fn explain(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<ExplainOut>, ApiError> {
    let env = state.envelope_for(req).await?;

    let resolved = resolve_available(&env.snapshot.available, &env.snapshot.teacher_off);
    let runs = group_runs(&resolved);
    let chunks =
        expand_arrangements(&env.request.arrangements).map_err(|e| ApiError(e.to_string()))?;
    let required_slots: usize = chunks.iter().map(|c| c.size as usize).sum();

    Ok(Json(ExplainOut {
        available_slots: resolved.len(),
        required_slots,
        feasible_supply: resolved.len() >= required_slots,
        resolved_slots: resolved,
        runs: runs
            .into_iter()
            .map(|r| RunOut {
                day: r.day,
                slots: r.slots,
            })
            .collect(),
        chunks: chunks
            .into_iter()
            .map(|c| ChunkOut {
                subject: c.subject,
                size: c.size,
            })
            .collect(),
    }))
}
