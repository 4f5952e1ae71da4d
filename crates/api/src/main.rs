mod error;
mod state;
mod store;
mod telemetry;
pub mod routes {
    pub mod apply;
    pub mod data;
    pub mod explain;
    pub mod health;
    pub mod jobs;
    pub mod options;
    pub mod solve;
    pub mod validate;
}

use axum::{
    routing::{get, post, put},
    Router,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            routes::health::health,
            routes::options::options,
            routes::solve::solve,
            routes::jobs::status,
            routes::jobs::result,
            routes::validate::validate_handler,
            routes::explain::explain,
            routes::apply::apply,
            routes::data::put_availability,
            routes::data::put_off_slots,
            routes::data::put_subject_teachers,
            routes::data::get_schedule,
        ),
        components(schemas(
            types::StudentId, types::TeacherId, types::DayOfWeek, types::TimeSlot,
            types::WeekKey, types::WeekSlot, types::TeacherOffSlot, types::CourseType,
            types::CourseArrangement, types::SlotFilter, types::SubjectTeacher,
            types::Placement, types::ScheduleItem, types::PlacementSummary,
            types::ScheduleOption, types::ScheduleRow, types::CapacityCheck,
            types::PairRule, types::SameDayRepeat, types::SearchPolicy,
            types::GenerateParams, types::GenerateRequest, types::WeekSnapshot,
            types::PlanEnvelope, types::GenerateReply, types::ApplyRequest,
            types::ApplyReply,
            jobs::JobId, jobs::JobStatus,
            routes::validate::ValidationReport,
            routes::solve::JobCreated,
            routes::explain::ExplainOut,
            routes::explain::RunOut,
            routes::explain::ChunkOut,
            routes::data::AvailabilityIn,
            routes::data::OffSlotsIn,
            routes::data::BindingsIn
        )),
        tags(
            (name = "tutorplan", description = "Tutoring schedule generation API")
        )
    )]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let app_state = state::AppState::new_default();

    let app = Router::new()
        .route("/v1/health", get(routes::health::health))
        .route("/v1/options", post(routes::options::options))
        .route("/v1/solve", post(routes::solve::solve))
        .route("/v1/jobs/:id", get(routes::jobs::status))
        .route("/v1/jobs/:id/result", get(routes::jobs::result))
        .route("/v1/validate", post(routes::validate::validate_handler))
        .route("/v1/explain", post(routes::explain::explain))
        .route("/v1/apply", post(routes::apply::apply))
        .route(
            "/v1/students/:id/availability",
            put(routes::data::put_availability),
        )
        .route(
            "/v1/students/:id/subject-teachers",
            put(routes::data::put_subject_teachers),
        )
        .route("/v1/students/:id/schedule", get(routes::data::get_schedule))
        .route("/v1/teachers/off-slots", put(routes::data::put_off_slots))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(telemetry::stack())
        .with_state(app_state);

    let port = std::env::var("TUTORPLAN__SERVER__PORT").unwrap_or_else(|_| "8080".into());
    let addr: std::net::SocketAddr = format!("0.0.0.0:{port}").parse()?;
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
