use std::collections::{BTreeMap, HashSet};
use types::{DayOfWeek, TeacherOffSlot, TimeSlot, WeekSlot, SLOTS_PER_DAY};

/// A maximal ascending sequence of consecutive slots on one day.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConsecutiveRun {
    pub day: DayOfWeek,
    pub slots: Vec<TimeSlot>,
}

impl ConsecutiveRun {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Week-slots the student can actually be scheduled in: declared availability
/// minus every teacher off-slot, materialized over the full 7x10 domain in
/// ascending (day, slot) order. Off-slots block regardless of which teacher
/// will ultimately teach.
pub fn resolve_available(declared: &[WeekSlot], off: &[TeacherOffSlot]) -> Vec<WeekSlot> {
    let declared_set: HashSet<WeekSlot> = declared.iter().copied().collect();
    let off_set: HashSet<WeekSlot> = off
        .iter()
        .map(|o| WeekSlot {
            day: o.day,
            slot: o.slot,
        })
        .collect();

    let mut slots = Vec::new();
    for day in DayOfWeek::ALL {
        for s in 1..=SLOTS_PER_DAY {
            let ws = WeekSlot {
                day,
                slot: TimeSlot(s),
            };
            if declared_set.contains(&ws) && !off_set.contains(&ws) {
                slots.push(ws);
            }
        }
    }
    slots
}

/// Maximal runs of consecutive slots per day; a gap breaks a run and a lone
/// slot is a run of length 1. Runs come out in ascending day then start-slot
/// order regardless of input order.
pub fn group_runs(available: &[WeekSlot]) -> Vec<ConsecutiveRun> {
    let mut by_day: BTreeMap<DayOfWeek, Vec<TimeSlot>> = BTreeMap::new();
    for ws in available {
        by_day.entry(ws.day).or_default().push(ws.slot);
    }

    let mut runs = Vec::new();
    for (day, mut slots) in by_day {
        slots.sort_unstable();
        slots.dedup();

        let mut run = vec![slots[0]];
        for &s in slots.iter().skip(1) {
            let prev = run[run.len() - 1];
            if s.0 == prev.0 + 1 {
                run.push(s);
            } else {
                runs.push(ConsecutiveRun {
                    day,
                    slots: std::mem::replace(&mut run, vec![s]),
                });
            }
        }
        runs.push(ConsecutiveRun { day, slots: run });
    }
    runs
}
