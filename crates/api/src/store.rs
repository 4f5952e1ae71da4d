use async_trait::async_trait;
use parking_lot::RwLock;
use plan_core::ScheduleStore;
use std::collections::HashMap;
use types::{
    CapacityCheck, CourseType, DayOfWeek, ScheduleRow, StudentId, SubjectTeacher, TeacherOffSlot,
    TimeSlot, WeekKey, WeekSlot, NON_ONLINE_SLOT_CAPACITY,
};

type Scope = (String, String);

fn scope(student: &StudentId, week: &WeekKey) -> Scope {
    (student.0.clone(), week.0.clone())
}

/// In-memory stand-in for the center's persistence layer. Schedule rows are
/// keyed by (student, week); the capacity count spans all students.
#[derive(Default)]
pub struct MemStore {
    availability: RwLock<HashMap<Scope, Vec<WeekSlot>>>,
    off_slots: RwLock<HashMap<String, Vec<TeacherOffSlot>>>,
    bindings: RwLock<HashMap<String, Vec<SubjectTeacher>>>,
    schedules: RwLock<HashMap<Scope, Vec<ScheduleRow>>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_availability(&self, student: &StudentId, week: &WeekKey, slots: Vec<WeekSlot>) {
        self.availability.write().insert(scope(student, week), slots);
    }

    pub fn set_off_slots(&self, week: &WeekKey, slots: Vec<TeacherOffSlot>) {
        self.off_slots.write().insert(week.0.clone(), slots);
    }

    pub fn set_subject_teachers(&self, student: &StudentId, bindings: Vec<SubjectTeacher>) {
        self.bindings.write().insert(student.0.clone(), bindings);
    }
}

#[async_trait]
impl ScheduleStore for MemStore {
    async fn available_slots(
        &self,
        student: &StudentId,
        week: &WeekKey,
    ) -> anyhow::Result<Vec<WeekSlot>> {
        Ok(self
            .availability
            .read()
            .get(&scope(student, week))
            .cloned()
            .unwrap_or_default())
    }

    async fn teacher_off_slots(&self, week: &WeekKey) -> anyhow::Result<Vec<TeacherOffSlot>> {
        Ok(self
            .off_slots
            .read()
            .get(&week.0)
            .cloned()
            .unwrap_or_default())
    }

    async fn subject_teachers(
        &self,
        student: &StudentId,
    ) -> anyhow::Result<Vec<SubjectTeacher>> {
        Ok(self
            .bindings
            .read()
            .get(&student.0)
            .cloned()
            .unwrap_or_default())
    }

    async fn week_schedule(
        &self,
        student: &StudentId,
        week: &WeekKey,
    ) -> anyhow::Result<Vec<ScheduleRow>> {
        Ok(self
            .schedules
            .read()
            .get(&scope(student, week))
            .cloned()
            .unwrap_or_default())
    }

    async fn classroom_capacity(
        &self,
        week: &WeekKey,
        day: DayOfWeek,
        slot: TimeSlot,
        course_type: &CourseType,
    ) -> anyhow::Result<CapacityCheck> {
        let current_count = self
            .schedules
            .read()
            .iter()
            .filter(|((_, w), _)| w == &week.0)
            .flat_map(|(_, rows)| rows.iter())
            .filter(|r| {
                r.day == day && r.slot == slot && r.course_type.counts_against_capacity()
            })
            .count() as u32;

        if !course_type.counts_against_capacity() {
            return Ok(CapacityCheck {
                allowed: true,
                at_ceiling: false,
                current_count,
            });
        }
        if current_count >= NON_ONLINE_SLOT_CAPACITY {
            return Ok(CapacityCheck {
                allowed: false,
                at_ceiling: true,
                current_count,
            });
        }
        Ok(CapacityCheck {
            allowed: true,
            at_ceiling: false,
            current_count,
        })
    }

    async fn replace_week(
        &self,
        student: &StudentId,
        week: &WeekKey,
        rows: Vec<ScheduleRow>,
    ) -> anyhow::Result<()> {
        if rows
            .iter()
            .any(|r| r.student_id != *student || r.week != *week)
        {
            anyhow::bail!("row scope mismatch for student {student}, week {week}");
        }
        // delete + insert under one write lock
        self.schedules.write().insert(scope(student, week), rows);
        Ok(())
    }
}
