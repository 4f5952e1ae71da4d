use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::State, Json};
use plan_core::commit::apply_option;
use types::{ApplyReply, ApplyRequest};

/// Applies a chosen option: capacity check first, then an atomic
/// delete-and-reinsert of the student's week.
#[utoipa::path(
    post,
    path = "/v1/apply",
    request_body = ApplyRequest,
    responses(
    (status = 200, description = "Apply outcome", body = ApplyReply)
    )
)]
pub async fn apply(
    State(state): State<AppState>,
    Json(req): Json<ApplyRequest>,
) -> Result<Json<ApplyReply>, ApiError> {
    if !req.week.is_valid_format() {
        return Err(ApiError(format!("week key has invalid format: {}", req.week)));
    }
    match apply_option(state.store.as_ref(), &req.student_id, &req.week, &req.option).await {
        Ok(reply) => Ok(Json(reply)),
        Err(e) => Ok(Json(ApplyReply {
            success: false,
            message: e.to_string(),
        })),
    }
}
