use solver_backtrack::BacktrackPlanner;
use types::{
    CourseArrangement, CourseType, DayOfWeek, GenerateParams, GenerateRequest, PlanEnvelope,
    SlotFilter, StudentId, TeacherId, TeacherOffSlot, TimeSlot, WeekKey, WeekSlot, WeekSnapshot,
};

fn ws(day: DayOfWeek, slot: u8) -> WeekSlot {
    WeekSlot {
        day,
        slot: TimeSlot(slot),
    }
}

fn arrangement(subject: &str, hours: u32) -> CourseArrangement {
    CourseArrangement {
        subject: subject.into(),
        course_type: CourseType::OneOnOne,
        hours,
        remark: None,
    }
}

fn envelope(
    arrangements: Vec<CourseArrangement>,
    available: Vec<WeekSlot>,
    teacher_off: Vec<TeacherOffSlot>,
    filters: Vec<SlotFilter>,
) -> PlanEnvelope {
    PlanEnvelope {
        request: GenerateRequest {
            student_id: StudentId("s1".into()),
            week: WeekKey("2025-03-10".into()),
            arrangements,
            filters,
            params: GenerateParams::default(),
        },
        snapshot: WeekSnapshot {
            available,
            teacher_off,
            existing: vec![],
        },
    }
}

#[test]
fn two_hour_course_fills_the_monday_pair() {
    let planner = BacktrackPlanner::new();
    let reply = planner.plan(&envelope(
        vec![arrangement("Writing", 2)],
        vec![ws(DayOfWeek::Mon, 1), ws(DayOfWeek::Mon, 2)],
        vec![],
        vec![],
    ));

    assert!(reply.success);
    assert_eq!(reply.options.len(), 1);
    let items = &reply.options[0].items;
    assert_eq!(items.len(), 2);
    assert_eq!((items[0].day, items[0].slot), (DayOfWeek::Mon, TimeSlot(1)));
    assert_eq!((items[1].day, items[1].slot), (DayOfWeek::Mon, TimeSlot(2)));
    assert!(items.iter().all(|i| i.subject == "Writing"));
}

#[test]
fn one_slot_cannot_host_two_hours() {
    let planner = BacktrackPlanner::new();
    let reply = planner.plan(&envelope(
        vec![arrangement("Writing", 2)],
        vec![ws(DayOfWeek::Mon, 1)],
        vec![],
        vec![],
    ));

    assert!(!reply.success);
    assert!(reply.message.contains("2 slots required"));
    assert!(reply.message.contains("only 1 available"));
    assert!(reply.options.is_empty());
}

#[test]
fn filter_steers_subjects_between_runs() {
    let planner = BacktrackPlanner::new();
    let reply = planner.plan(&envelope(
        vec![arrangement("Writing", 2), arrangement("Reading", 2)],
        vec![
            ws(DayOfWeek::Mon, 1),
            ws(DayOfWeek::Mon, 2),
            ws(DayOfWeek::Tue, 3),
            ws(DayOfWeek::Tue, 4),
        ],
        vec![],
        vec![SlotFilter {
            day: DayOfWeek::Mon,
            slot: TimeSlot(1),
            subject: "Reading".into(),
        }],
    ));

    assert!(reply.success);
    assert!(!reply.options.is_empty());
    for option in &reply.options {
        for item in &option.items {
            if item.day == DayOfWeek::Mon && item.slot == TimeSlot(1) {
                assert_eq!(item.subject, "Reading");
            }
        }
    }
    // the accepted shape: Reading on the Monday pair, Writing on the Tuesday pair
    let first = &reply.options[0];
    let reading_days: Vec<_> = first
        .summary
        .iter()
        .filter(|s| s.subject == "Reading")
        .map(|s| s.day)
        .collect();
    assert_eq!(reading_days, vec![DayOfWeek::Mon]);
    let writing_days: Vec<_> = first
        .summary
        .iter()
        .filter(|s| s.subject == "Writing")
        .map(|s| s.day)
        .collect();
    assert_eq!(writing_days, vec![DayOfWeek::Tue]);
}

#[test]
fn teacher_off_slot_blocks_a_declared_slot() {
    let planner = BacktrackPlanner::new();
    let reply = planner.plan(&envelope(
        vec![arrangement("Writing", 1)],
        vec![ws(DayOfWeek::Mon, 1), ws(DayOfWeek::Tue, 4)],
        vec![TeacherOffSlot {
            teacher_id: TeacherId("t9".into()),
            day: DayOfWeek::Mon,
            slot: TimeSlot(1),
        }],
        vec![],
    ));

    assert!(reply.success);
    for option in &reply.options {
        for item in &option.items {
            assert_ne!((item.day, item.slot), (DayOfWeek::Mon, TimeSlot(1)));
        }
    }
}

#[test]
fn generation_is_idempotent_for_identical_snapshots() {
    let planner = BacktrackPlanner::new();
    let env = envelope(
        vec![arrangement("Writing", 2), arrangement("Reading", 1)],
        vec![
            ws(DayOfWeek::Mon, 1),
            ws(DayOfWeek::Mon, 2),
            ws(DayOfWeek::Mon, 3),
            ws(DayOfWeek::Wed, 6),
            ws(DayOfWeek::Wed, 7),
        ],
        vec![],
        vec![],
    );

    let first = serde_json::to_value(planner.plan(&env)).unwrap();
    let second = serde_json::to_value(planner.plan(&env)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn option_cap_keeps_the_first_ranked_option() {
    let available = vec![
        ws(DayOfWeek::Mon, 1),
        ws(DayOfWeek::Mon, 2),
        ws(DayOfWeek::Mon, 3),
        ws(DayOfWeek::Tue, 1),
        ws(DayOfWeek::Tue, 2),
    ];
    let arrangements = vec![arrangement("Writing", 2), arrangement("Reading", 1)];

    let planner = BacktrackPlanner::new();
    let unbounded = planner.plan(&envelope(
        arrangements.clone(),
        available.clone(),
        vec![],
        vec![],
    ));
    assert!(unbounded.options.len() > 1);

    let mut env = envelope(arrangements, available, vec![], vec![]);
    env.request.params.max_solutions = 1;
    let capped = planner.plan(&env);
    assert_eq!(capped.options.len(), 1);
    assert_eq!(capped.options[0].items, unbounded.options[0].items);
}
