use proptest::prelude::*;
use solver_backtrack::{resolve_available, BacktrackPlanner};
use std::collections::HashSet;
use types::{
    CourseArrangement, CourseType, DayOfWeek, GenerateParams, GenerateRequest, PlanEnvelope,
    SlotFilter, StudentId, TimeSlot, WeekKey, WeekSlot, WeekSnapshot,
};

fn week_slots() -> impl Strategy<Value = Vec<WeekSlot>> {
    proptest::collection::hash_set((0u8..7, 1u8..=10), 0..24).prop_map(|set| {
        let mut slots: Vec<WeekSlot> = set
            .into_iter()
            .filter_map(|(d, s)| {
                DayOfWeek::from_index0(d).map(|day| WeekSlot {
                    day,
                    slot: TimeSlot(s),
                })
            })
            .collect();
        slots.sort();
        slots
    })
}

fn arrangements() -> impl Strategy<Value = Vec<CourseArrangement>> {
    proptest::collection::vec(
        (
            proptest::sample::select(vec!["Writing", "Reading", "Listening"]),
            1u32..=4,
        ),
        1..=3,
    )
    .prop_map(|subjects| {
        subjects
            .into_iter()
            .map(|(subject, hours)| CourseArrangement {
                subject: subject.into(),
                course_type: CourseType::OneOnOne,
                hours,
                remark: None,
            })
            .collect()
    })
}

fn envelope(
    arrangements: Vec<CourseArrangement>,
    available: Vec<WeekSlot>,
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
            teacher_off: vec![],
            existing: vec![],
        },
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_option_satisfies_the_core_invariants(
        available in week_slots(),
        arrangements in arrangements(),
    ) {
        let resolved: HashSet<WeekSlot> =
            resolve_available(&available, &[]).into_iter().collect();
        let total_hours: u32 = arrangements.iter().map(|a| a.hours).sum();

        let planner = BacktrackPlanner::new();
        let reply = planner.plan(&envelope(arrangements, available, vec![]));

        for option in &reply.options {
            prop_assert_eq!(option.items.len() as u32, total_hours);

            let mut seen = HashSet::new();
            for item in &option.items {
                // no double booking
                prop_assert!(seen.insert((item.day, item.slot)));
                // every placed slot is in resolved availability
                let ws = WeekSlot { day: item.day, slot: item.slot };
                prop_assert!(resolved.contains(&ws));
            }

            for summary in &option.summary {
                prop_assert!(summary.hours == 1 || summary.hours == 2);
                if summary.hours == 2 {
                    prop_assert_eq!(summary.slots[1].0, summary.slots[0].0 + 1);
                }
            }
        }
    }

    #[test]
    fn filtered_slots_only_ever_carry_the_filtered_subject(
        available in week_slots(),
        arrangements in arrangements(),
        day_idx in 0u8..7,
        slot in 1u8..=10,
    ) {
        let day = DayOfWeek::from_index0(day_idx).unwrap();
        let filters = vec![SlotFilter {
            day,
            slot: TimeSlot(slot),
            subject: "Writing".into(),
        }];

        let planner = BacktrackPlanner::new();
        let reply = planner.plan(&envelope(arrangements, available, filters));

        for option in &reply.options {
            for item in &option.items {
                if item.day == day && item.slot == TimeSlot(slot) {
                    prop_assert_eq!(item.subject.as_str(), "Writing");
                }
            }
        }
    }

    #[test]
    fn replies_are_deterministic(
        available in week_slots(),
        arrangements in arrangements(),
    ) {
        let planner = BacktrackPlanner::new();
        let env = envelope(arrangements, available, vec![]);
        let a = serde_json::to_value(planner.plan(&env)).unwrap();
        let b = serde_json::to_value(planner.plan(&env)).unwrap();
        prop_assert_eq!(a, b);
    }
}
