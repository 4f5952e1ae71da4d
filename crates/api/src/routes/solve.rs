use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::State, Json};
use plan_core::{validate, ValidationError};
use types::GenerateRequest;
use utoipa::ToSchema;

#[derive(serde::Serialize, ToSchema)]
pub struct JobCreated {
    pub job_id: String,
    pub status: &'static str,
}

/// Same generation work as `/v1/options`, run off the request handler.
#[utoipa::path(
        post,
        path = "/v1/solve",
        request_body = GenerateRequest,
        responses((status = 200, description = "Generation job enqueued", body = JobCreated))
    )]
pub async fn solve(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<JobCreated>, ApiError> {
    if let Err(ValidationError::Msg(msg)) = validate(&req) {
        return Err(ApiError(msg));
    }
    let env = state.envelope_for(req).await?;
    let id = state.jobs.enqueue(env);
    Ok(Json(JobCreated {
        job_id: id.0,
        status: "queued",
    }))
}
