use crate::{PlanError, ScheduleStore};
use std::collections::HashMap;
use types::{ApplyReply, ScheduleOption, ScheduleRow, StudentId, TeacherId, WeekKey};

/// Applies a chosen option: capacity-checks every non-online item, resolves
/// teachers through the student's subject bindings, then atomically replaces
/// the week's rows. A capacity conflict aborts before any write.
pub async fn apply_option<S>(
    store: &S,
    student: &StudentId,
    week: &WeekKey,
    option: &ScheduleOption,
) -> Result<ApplyReply, PlanError>
where
    S: ScheduleStore + ?Sized,
{
    for item in &option.items {
        if !item.course_type.counts_against_capacity() {
            continue;
        }
        let check = store
            .classroom_capacity(week, item.day, item.slot, &item.course_type)
            .await
            .map_err(PlanError::Persistence)?;
        if !check.allowed && check.at_ceiling {
            let conflict = PlanError::CapacityConflict {
                day: item.day,
                slot: item.slot,
            };
            return Ok(ApplyReply {
                success: false,
                message: conflict.to_string(),
            });
        }
    }

    let bindings: HashMap<String, TeacherId> = store
        .subject_teachers(student)
        .await
        .map_err(PlanError::Persistence)?
        .into_iter()
        .map(|b| (b.subject, b.teacher_id))
        .collect();

    let rows: Vec<ScheduleRow> = option
        .items
        .iter()
        .map(|item| ScheduleRow {
            student_id: student.clone(),
            teacher_id: bindings.get(&item.subject).cloned(),
            subject: item.subject.clone(),
            day: item.day,
            slot: item.slot,
            week: week.clone(),
            course_type: item.course_type.clone(),
            remark: item.remark.clone(),
        })
        .collect();

    store
        .replace_week(student, week, rows)
        .await
        .map_err(PlanError::Persistence)?;

    Ok(ApplyReply {
        success: true,
        message: format!("schedule applied for student {student}, week {week}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScheduleStore;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use types::{
        CapacityCheck, CourseType, DayOfWeek, ScheduleItem, SubjectTeacher, TeacherOffSlot,
        TimeSlot, WeekSlot, NON_ONLINE_SLOT_CAPACITY,
    };

    struct StubStore {
        bindings: Vec<SubjectTeacher>,
        full_slots: Vec<(DayOfWeek, TimeSlot)>,
        rows: Mutex<Vec<ScheduleRow>>,
        fail_replace: bool,
    }

    impl StubStore {
        fn new() -> Self {
            Self {
                bindings: vec![SubjectTeacher {
                    subject: "Writing".into(),
                    teacher_id: TeacherId("t1".into()),
                }],
                full_slots: vec![],
                rows: Mutex::new(vec![]),
                fail_replace: false,
            }
        }
    }

    #[async_trait]
    impl ScheduleStore for StubStore {
        async fn available_slots(
            &self,
            _student: &StudentId,
            _week: &WeekKey,
        ) -> anyhow::Result<Vec<WeekSlot>> {
            Ok(vec![])
        }

        async fn teacher_off_slots(&self, _week: &WeekKey) -> anyhow::Result<Vec<TeacherOffSlot>> {
            Ok(vec![])
        }

        async fn subject_teachers(
            &self,
            _student: &StudentId,
        ) -> anyhow::Result<Vec<SubjectTeacher>> {
            Ok(self.bindings.clone())
        }

        async fn week_schedule(
            &self,
            _student: &StudentId,
            _week: &WeekKey,
        ) -> anyhow::Result<Vec<ScheduleRow>> {
            Ok(self.rows.lock().clone())
        }

        async fn classroom_capacity(
            &self,
            _week: &WeekKey,
            day: DayOfWeek,
            slot: TimeSlot,
            course_type: &CourseType,
        ) -> anyhow::Result<CapacityCheck> {
            if course_type.counts_against_capacity() && self.full_slots.contains(&(day, slot)) {
                return Ok(CapacityCheck {
                    allowed: false,
                    at_ceiling: true,
                    current_count: NON_ONLINE_SLOT_CAPACITY,
                });
            }
            Ok(CapacityCheck {
                allowed: true,
                at_ceiling: false,
                current_count: 0,
            })
        }

        async fn replace_week(
            &self,
            _student: &StudentId,
            _week: &WeekKey,
            rows: Vec<ScheduleRow>,
        ) -> anyhow::Result<()> {
            if self.fail_replace {
                anyhow::bail!("disk full");
            }
            *self.rows.lock() = rows;
            Ok(())
        }
    }

    fn option_with(items: Vec<ScheduleItem>) -> ScheduleOption {
        ScheduleOption {
            id: 1,
            items,
            summary: vec![],
        }
    }

    fn item(subject: &str, course_type: CourseType, day: DayOfWeek, slot: u8) -> ScheduleItem {
        ScheduleItem {
            subject: subject.into(),
            course_type,
            remark: None,
            day,
            slot: TimeSlot(slot),
        }
    }

    #[tokio::test]
    async fn applies_and_resolves_teachers() {
        let store = StubStore::new();
        let student = StudentId("s1".into());
        let week = WeekKey("2025-03-10".into());
        let option = option_with(vec![
            item("Writing", CourseType::OneOnOne, DayOfWeek::Mon, 1),
            item("Reading", CourseType::OneOnOne, DayOfWeek::Mon, 2),
        ]);

        let reply = apply_option(&store, &student, &week, &option).await.unwrap();
        assert!(reply.success);

        let rows = store.rows.lock().clone();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].teacher_id, Some(TeacherId("t1".into())));
        // no binding for Reading
        assert_eq!(rows[1].teacher_id, None);
        assert_eq!(rows[0].week, week);
    }

    #[tokio::test]
    async fn capacity_conflict_aborts_without_writes() {
        let mut store = StubStore::new();
        store.full_slots.push((DayOfWeek::Tue, TimeSlot(3)));
        store
            .rows
            .lock()
            .push(ScheduleRow {
                student_id: StudentId("s1".into()),
                teacher_id: None,
                subject: "Old".into(),
                day: DayOfWeek::Fri,
                slot: TimeSlot(9),
                week: WeekKey("2025-03-10".into()),
                course_type: CourseType::OneOnOne,
                remark: None,
            });

        let option = option_with(vec![
            item("Writing", CourseType::OneOnOne, DayOfWeek::Mon, 1),
            item("Writing", CourseType::OneOnOne, DayOfWeek::Tue, 3),
        ]);
        let reply = apply_option(
            &store,
            &StudentId("s1".into()),
            &WeekKey("2025-03-10".into()),
            &option,
        )
        .await
        .unwrap();

        assert!(!reply.success);
        assert!(reply.message.contains("Tue"));
        assert!(reply.message.contains("3"));
        // prior schedule untouched
        assert_eq!(store.rows.lock().len(), 1);
        assert_eq!(store.rows.lock()[0].subject, "Old");
    }

    #[tokio::test]
    async fn online_items_skip_the_capacity_check() {
        let mut store = StubStore::new();
        store.full_slots.push((DayOfWeek::Mon, TimeSlot(1)));

        let option = option_with(vec![item("Writing", CourseType::Online, DayOfWeek::Mon, 1)]);
        let reply = apply_option(
            &store,
            &StudentId("s1".into()),
            &WeekKey("2025-03-10".into()),
            &option,
        )
        .await
        .unwrap();
        assert!(reply.success);
    }

    #[tokio::test]
    async fn replace_failure_surfaces_as_persistence_error() {
        let mut store = StubStore::new();
        store.fail_replace = true;

        let option = option_with(vec![item("Writing", CourseType::OneOnOne, DayOfWeek::Mon, 1)]);
        let err = apply_option(
            &store,
            &StudentId("s1".into()),
            &WeekKey("2025-03-10".into()),
            &option,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, PlanError::Persistence(_)));
    }
}
