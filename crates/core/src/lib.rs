pub mod commit;
pub mod format;

use async_trait::async_trait;
use thiserror::Error;

pub use types::{
    ApplyReply, CapacityCheck, CourseArrangement, CourseType, DayOfWeek, GenerateReply,
    GenerateRequest, PlanEnvelope, ScheduleOption, ScheduleRow, StudentId, SubjectTeacher,
    TeacherId, TeacherOffSlot, TimeSlot, WeekKey, WeekSlot, WeekSnapshot,
};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid request: {0}")]
    Msg(String),
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("demand exceeds supply: {required} slots required, only {available} available")]
    InfeasibleDemand { required: usize, available: usize },
    #[error("classroom capacity reached on {day} slot {slot}: non-online ceiling hit")]
    CapacityConflict { day: DayOfWeek, slot: TimeSlot },
    #[error("persistence failure: {0}")]
    Persistence(#[source] anyhow::Error),
}

pub fn validate(req: &GenerateRequest) -> Result<(), ValidationError> {
    let mut errors: Vec<String> = Vec::new();

    if !req.week.is_valid_format() {
        errors.push(format!("week key has invalid format: {}", req.week));
    }

    if req.arrangements.is_empty() {
        errors.push("no course arrangements provided".into());
    }
    for a in &req.arrangements {
        if a.subject.trim().is_empty() {
            errors.push("arrangement has blank subject".into());
        }
        if a.hours == 0 {
            errors.push(format!("arrangement {} has hours=0", a.subject));
        }
    }

    use std::collections::HashMap;
    let mut filter_subjects: HashMap<(DayOfWeek, TimeSlot), &str> = HashMap::new();
    for f in &req.filters {
        if !f.slot.is_valid() {
            errors.push(format!("filter on {} has invalid slot {}", f.day, f.slot));
            continue;
        }
        if let Some(prev) = filter_subjects.insert((f.day, f.slot), f.subject.as_str()) {
            if prev != f.subject {
                errors.push(format!(
                    "conflicting filters on {} slot {}: {} vs {}",
                    f.day, f.slot, prev, f.subject
                ));
            }
        }
    }

    if req.params.max_solutions == 0 {
        errors.push("max_solutions must be at least 1".into());
    }
    if req.params.max_nodes == 0 {
        errors.push("max_nodes must be at least 1".into());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Msg(errors.join("; ")))
    }
}

#[async_trait]
pub trait Planner: Send + Sync + 'static {
    async fn generate(&self, env: PlanEnvelope) -> anyhow::Result<GenerateReply>;
}

/// Collaborator surface of the surrounding application: availability,
/// off-slots, bindings, schedule rows, and the classroom-capacity predicate.
#[async_trait]
pub trait ScheduleStore: Send + Sync + 'static {
    async fn available_slots(
        &self,
        student: &StudentId,
        week: &WeekKey,
    ) -> anyhow::Result<Vec<WeekSlot>>;

    async fn teacher_off_slots(&self, week: &WeekKey) -> anyhow::Result<Vec<TeacherOffSlot>>;

    async fn subject_teachers(&self, student: &StudentId)
        -> anyhow::Result<Vec<SubjectTeacher>>;

    async fn week_schedule(
        &self,
        student: &StudentId,
        week: &WeekKey,
    ) -> anyhow::Result<Vec<ScheduleRow>>;

    async fn classroom_capacity(
        &self,
        week: &WeekKey,
        day: DayOfWeek,
        slot: TimeSlot,
        course_type: &CourseType,
    ) -> anyhow::Result<CapacityCheck>;

    /// Replaces every row for (student, week) in one atomic step. A failure
    /// must leave the prior schedule intact, and implementations serialize
    /// concurrent writers of the same scope.
    async fn replace_week(
        &self,
        student: &StudentId,
        week: &WeekKey,
        rows: Vec<ScheduleRow>,
    ) -> anyhow::Result<()>;
}

pub async fn load_snapshot<S: ScheduleStore + ?Sized>(
    store: &S,
    student: &StudentId,
    week: &WeekKey,
) -> anyhow::Result<WeekSnapshot> {
    Ok(WeekSnapshot {
        available: store.available_slots(student, week).await?,
        teacher_off: store.teacher_off_slots(week).await?,
        existing: store.week_schedule(student, week).await?,
    })
}
