use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::State, Json};
use plan_core::{validate, Planner, ValidationError};
use types::{GenerateRequest, GenerateReply};

/// Synchronous generation: validate, snapshot the store, search, reply.
#[utoipa::path(
        post,
        path = "/v1/options",
        request_body = GenerateRequest,
        responses((status = 200, description = "Candidate schedule options", body = GenerateReply))
    )]
pub async fn options(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateReply>, ApiError> {
    if let Err(ValidationError::Msg(msg)) = validate(&req) {
        return Ok(Json(GenerateReply {
            success: false,
            options: vec![],
            message: msg,
            stats: serde_json::json!({}),
        }));
    }
    let env = state.envelope_for(req).await?;
    let reply = state.planner.generate(env).await?;
    Ok(Json(reply))
}
