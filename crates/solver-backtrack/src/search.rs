use crate::availability::ConsecutiveRun;
use crate::expand::CourseChunk;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::debug;
use types::{
    DayOfWeek, PairRule, Placement, SameDayRepeat, SearchPolicy, SlotFilter, TimeSlot, WeekSlot,
    FIXED_DOUBLE_PAIRS,
};

#[derive(Clone, Copy, Debug)]
pub struct SearchBudget {
    pub max_solutions: usize,
    pub max_nodes: u64,
    pub time_budget: Option<Duration>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SearchStats {
    /// Candidate placements examined.
    pub nodes: u64,
    pub solutions: usize,
    /// Set when the node or wall-clock budget cut the search short.
    pub truncated: bool,
}

/// Depth-first backtracking over the chunk list, one chunk per level.
///
/// Two-slot chunks consume consecutive windows inside runs; one-slot chunks
/// may land on any individual available slot. Iteration follows the fixed
/// ascending (day, slot) order of the inputs, so results are deterministic
/// and option #1 is the lexicographically first valid solution.
pub fn search(
    chunks: &[CourseChunk],
    runs: &[ConsecutiveRun],
    available: &[WeekSlot],
    filters: &[SlotFilter],
    policy: SearchPolicy,
    budget: SearchBudget,
) -> (Vec<Vec<Placement>>, SearchStats) {
    let mut state = SearchState {
        chunks,
        runs,
        available,
        filters,
        policy,
        budget,
        deadline: budget.time_budget.map(|d| Instant::now() + d),
        used: HashSet::new(),
        day_subjects: HashSet::new(),
        partial: Vec::with_capacity(chunks.len()),
        solutions: Vec::new(),
        stats: SearchStats::default(),
    };
    state.descend(0);
    let SearchState { solutions, stats, .. } = state;
    (solutions, stats)
}

struct SearchState<'a> {
    chunks: &'a [CourseChunk],
    runs: &'a [ConsecutiveRun],
    available: &'a [WeekSlot],
    filters: &'a [SlotFilter],
    policy: SearchPolicy,
    budget: SearchBudget,
    deadline: Option<Instant>,
    used: HashSet<WeekSlot>,
    day_subjects: HashSet<(DayOfWeek, String)>,
    partial: Vec<Placement>,
    solutions: Vec<Vec<Placement>>,
    stats: SearchStats,
}

impl SearchState<'_> {
    fn done(&mut self) -> bool {
        if self.solutions.len() >= self.budget.max_solutions {
            return true;
        }
        if self.stats.nodes >= self.budget.max_nodes {
            self.stats.truncated = true;
            return true;
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                self.stats.truncated = true;
                return true;
            }
        }
        false
    }

    fn descend(&mut self, index: usize) {
        if index == self.chunks.len() {
            self.solutions.push(self.partial.clone());
            self.stats.solutions = self.solutions.len();
            debug!(solution = self.solutions.len(), "recorded solution");
            return;
        }

        let chunk = self.chunks[index].clone();

        if chunk.size == 2 {
            for run_idx in 0..self.runs.len() {
                if self.runs[run_idx].len() < 2 {
                    continue;
                }
                for start in 0..=self.runs[run_idx].len() - 2 {
                    let day = self.runs[run_idx].day;
                    let first = self.runs[run_idx].slots[start];
                    let second = self.runs[run_idx].slots[start + 1];
                    self.try_place(index, &chunk, day, &[first, second]);
                    if self.done() {
                        return;
                    }
                }
            }
        } else {
            for i in 0..self.available.len() {
                let ws = self.available[i];
                self.try_place(index, &chunk, ws.day, &[ws.slot]);
                if self.done() {
                    return;
                }
            }
        }
    }

    fn try_place(&mut self, index: usize, chunk: &CourseChunk, day: DayOfWeek, slots: &[TimeSlot]) {
        self.stats.nodes += 1;

        if chunk.size == 2 && self.policy.pair_rule == PairRule::FixedPairs {
            let pair = (slots[0].0, slots[1].0);
            if !FIXED_DOUBLE_PAIRS.contains(&pair) {
                return;
            }
        }

        if slots
            .iter()
            .any(|&slot| self.used.contains(&WeekSlot { day, slot }))
        {
            debug!(%day, ?slots, subject = %chunk.subject, "candidate already consumed");
            return;
        }

        for &slot in slots {
            if let Some(f) = self
                .filters
                .iter()
                .find(|f| f.day == day && f.slot == slot && f.subject != chunk.subject)
            {
                debug!(%day, %slot, expected = %f.subject, subject = %chunk.subject, "candidate violates slot filter");
                return;
            }
        }

        let day_key = (day, chunk.subject.clone());
        if self.policy.same_day_repeat == SameDayRepeat::ForbidPerSubject
            && self.day_subjects.contains(&day_key)
        {
            debug!(%day, subject = %chunk.subject, "subject already placed on this day");
            return;
        }

        debug!(%day, ?slots, subject = %chunk.subject, "trying candidate");

        for &slot in slots {
            self.used.insert(WeekSlot { day, slot });
        }
        let day_key_inserted = self.day_subjects.insert(day_key.clone());
        self.partial.push(Placement {
            subject: chunk.subject.clone(),
            course_type: chunk.course_type.clone(),
            remark: chunk.remark.clone(),
            day,
            slots: slots.to_vec(),
        });

        self.descend(index + 1);

        self.partial.pop();
        if day_key_inserted {
            self.day_subjects.remove(&day_key);
        }
        for &slot in slots {
            self.used.remove(&WeekSlot { day, slot });
        }
    }
}
