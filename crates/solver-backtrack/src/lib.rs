pub mod availability;
pub mod expand;
pub mod search;

pub use availability::{group_runs, resolve_available, ConsecutiveRun};
pub use expand::{expand_arrangements, CourseChunk};
pub use search::{search, SearchBudget, SearchStats};

use async_trait::async_trait;
use plan_core::{format, PlanError, Planner};
use std::time::Duration;
use tracing::debug;
use types::{CourseArrangement, GenerateReply, PlanEnvelope, WeekSlot};

pub struct BacktrackPlanner;

impl BacktrackPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Full generation pass: resolve availability, group runs, expand the
    /// arrangements, search, rank. Pure with respect to the envelope; the
    /// same inputs always produce the same reply.
    pub fn plan(&self, env: &PlanEnvelope) -> GenerateReply {
        match self.plan_inner(env) {
            Ok(reply) => reply,
            Err(e) => GenerateReply {
                success: false,
                options: vec![],
                message: e.to_string(),
                stats: serde_json::json!({"method": "backtrack"}),
            },
        }
    }

    fn plan_inner(&self, env: &PlanEnvelope) -> Result<GenerateReply, PlanError> {
        let req = &env.request;

        if req.arrangements.is_empty() {
            return Err(PlanError::Configuration(
                "no course arrangements provided".into(),
            ));
        }
        if env.snapshot.available.is_empty() {
            return Err(PlanError::Configuration(format!(
                "student {} has no available slots declared for week {}",
                req.student_id, req.week
            )));
        }

        let available = resolve_available(&env.snapshot.available, &env.snapshot.teacher_off);
        let runs = group_runs(&available);
        let chunks = expand_arrangements(&req.arrangements)?;

        let required: usize = chunks.iter().map(|c| c.size as usize).sum();
        if available.len() < required {
            return Err(PlanError::InfeasibleDemand {
                required,
                available: available.len(),
            });
        }

        debug!(
            chunks = chunks.len(),
            runs = runs.len(),
            available = available.len(),
            "starting backtracking search"
        );

        let budget = SearchBudget {
            max_solutions: req.params.max_solutions,
            max_nodes: req.params.max_nodes,
            time_budget: req.params.time_budget_ms.map(Duration::from_millis),
        };
        let (solutions, stats) = search(
            &chunks,
            &runs,
            &available,
            &req.filters,
            req.params.policy,
            budget,
        );

        let stats_json = serde_json::json!({
            "method": "backtrack",
            "nodes": stats.nodes,
            "solutions": stats.solutions,
            "truncated": stats.truncated,
        });

        if solutions.is_empty() {
            return Ok(GenerateReply {
                success: false,
                options: vec![],
                message: no_solution_message(&req.arrangements, &chunks, &available, &runs),
                stats: stats_json,
            });
        }

        let options = solutions
            .iter()
            .enumerate()
            .map(|(i, placements)| format::build_option(i as u32 + 1, placements))
            .collect::<Vec<_>>();
        Ok(GenerateReply {
            success: true,
            message: format!("generated {} schedule options", options.len()),
            options,
            stats: stats_json,
        })
    }
}

#[async_trait]
impl Planner for BacktrackPlanner {
    async fn generate(&self, env: PlanEnvelope) -> anyhow::Result<GenerateReply> {
        Ok(self.plan(&env))
    }
}

fn describe_runs(runs: &[ConsecutiveRun]) -> String {
    runs.iter()
        .map(|r| {
            let slots = r
                .slots
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(",");
            format!("{}[{}]", r.day, slots)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Diagnostic detail for the operator: what was asked, how it expanded, and
/// what the week actually offers.
fn no_solution_message(
    arrangements: &[CourseArrangement],
    chunks: &[CourseChunk],
    available: &[WeekSlot],
    runs: &[ConsecutiveRun],
) -> String {
    let original = arrangements
        .iter()
        .map(|a| format!("{} {}h", a.subject, a.hours))
        .collect::<Vec<_>>()
        .join(", ");
    let expanded = chunks
        .iter()
        .map(|c| format!("{} {}h", c.subject, c.size))
        .collect::<Vec<_>>()
        .join(", ");
    let doubles = chunks.iter().filter(|c| c.size == 2).count();
    format!(
        "no feasible schedule found\nrequested: {original}\nexpanded: {expanded}\n\
         available slots: {}\nruns: {}\n{doubles} consecutive pair(s) needed; \
         check whether the runs can host them",
        available.len(),
        describe_runs(runs)
    )
}
