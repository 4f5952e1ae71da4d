use crate::store::MemStore;
use jobs::InMemJobs;
use plan_core::load_snapshot;
use solver_backtrack::BacktrackPlanner;
use std::sync::Arc;
use types::{GenerateRequest, PlanEnvelope};

#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<InMemJobs<BacktrackPlanner>>,
    pub store: Arc<MemStore>,
    pub planner: Arc<BacktrackPlanner>,
}

impl AppState {
    pub fn new_default() -> Self {
        Self {
            jobs: Arc::new(InMemJobs::new(BacktrackPlanner::new())),
            store: Arc::new(MemStore::new()),
            planner: Arc::new(BacktrackPlanner::new()),
        }
    }

    /// Reads the week snapshot fresh from the store and pairs it with the
    /// request.
    pub async fn envelope_for(&self, request: GenerateRequest) -> anyhow::Result<PlanEnvelope> {
        let snapshot =
            load_snapshot(self.store.as_ref(), &request.student_id, &request.week).await?;
        Ok(PlanEnvelope { request, snapshot })
    }
}
