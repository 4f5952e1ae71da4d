use parking_lot::RwLock;
use plan_core::Planner;
use std::collections::HashMap;
use tracing::error;
use types::{GenerateReply, PlanEnvelope};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct JobId(pub String);

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(tag = "status")]
pub enum JobStatus {
    Queued,
    Running,
    Done { reply: GenerateReply },
    Failed { message: String },
}

#[derive(Clone)]
pub struct InMemJobs<P: Planner> {
    inner: std::sync::Arc<RwLock<HashMap<String, JobStatus>>>,
    planner: std::sync::Arc<P>,
}

impl<P: Planner> InMemJobs<P> {
    pub fn new(planner: P) -> Self {
        Self {
            inner: Default::default(),
            planner: std::sync::Arc::new(planner),
        }
    }

    pub fn enqueue(&self, env: PlanEnvelope) -> JobId {
        let id = Uuid::new_v4().to_string();
        self.inner.write().insert(id.clone(), JobStatus::Queued);

        let map = self.inner.clone();
        let planner = self.planner.clone();
        let id_for_task = id.clone();

        tokio::spawn(async move {
            {
                let mut w = map.write();
                w.insert(id_for_task.clone(), JobStatus::Running);
            }
            match planner.generate(env).await {
                Ok(reply) => {
                    map.write()
                        .insert(id_for_task, JobStatus::Done { reply });
                }
                Err(e) => {
                    error!(?e, "generation job failed");
                    map.write().insert(
                        id_for_task,
                        JobStatus::Failed {
                            message: e.to_string(),
                        },
                    );
                }
            }
        });

        JobId(id)
    }

    pub fn get(&self, id: &str) -> Option<JobStatus> {
        self.inner.read().get(id).cloned()
    }
}
