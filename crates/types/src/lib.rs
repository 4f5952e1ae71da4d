use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}
id_newtype!(StudentId);
id_newtype!(TeacherId);

pub const DAYS_PER_WEEK: usize = 7;
pub const SLOTS_PER_DAY: u8 = 10;

/// Back-to-back slot pairs usable when `PairRule::FixedPairs` is in effect.
pub const FIXED_DOUBLE_PAIRS: [(u8, u8); 5] = [(1, 2), (3, 4), (5, 6), (7, 8), (9, 10)];

/// Concurrency ceiling for non-online sessions sharing one (day, slot).
pub const NON_ONLINE_SLOT_CAPACITY: u32 = 5;

#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash,
    PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; DAYS_PER_WEEK] = [
        DayOfWeek::Mon,
        DayOfWeek::Tue,
        DayOfWeek::Wed,
        DayOfWeek::Thu,
        DayOfWeek::Fri,
        DayOfWeek::Sat,
        DayOfWeek::Sun,
    ];

    /// 0-based index used by the search engine.
    pub fn index0(self) -> u8 {
        self as u8
    }

    /// 1-based index used in persisted schedule rows.
    pub fn iso_index(self) -> u8 {
        self as u8 + 1
    }

    pub fn from_index0(i: u8) -> Option<Self> {
        Self::ALL.get(i as usize).copied()
    }

    pub fn short_name(self) -> &'static str {
        match self {
            DayOfWeek::Mon => "Mon",
            DayOfWeek::Tue => "Tue",
            DayOfWeek::Wed => "Wed",
            DayOfWeek::Thu => "Thu",
            DayOfWeek::Fri => "Fri",
            DayOfWeek::Sat => "Sat",
            DayOfWeek::Sun => "Sun",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash,
    PartialOrd, Ord,
)]
#[serde(transparent)]
pub struct TimeSlot(pub u8);

impl TimeSlot {
    pub fn is_valid(&self) -> bool {
        (1..=SLOTS_PER_DAY).contains(&self.0)
    }

    pub fn next(self) -> Option<TimeSlot> {
        if self.0 < SLOTS_PER_DAY {
            Some(TimeSlot(self.0 + 1))
        } else {
            None
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Monday of the target ISO week, `YYYY-MM-DD`. Scoping key for all
/// availability and schedule data.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash)]
#[serde(transparent)]
pub struct WeekKey(pub String);

impl WeekKey {
    pub fn is_valid_format(&self) -> bool {
        let parts: Vec<_> = self.0.split('-').collect();
        if parts.len() != 3 {
            return false;
        }
        let (y, m, d) = (parts[0], parts[1], parts[2]);
        if y.len() != 4 || m.len() != 2 || d.len() != 2 {
            return false;
        }
        let year_ok = y.parse::<u32>().is_ok();
        let month_ok = matches!(m.parse::<u32>(), Ok(v) if (1..=12).contains(&v));
        let day_ok = matches!(d.parse::<u32>(), Ok(v) if (1..=31).contains(&v));
        year_ok && month_ok && day_ok
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One (day, slot) pair a student has declared open. Set semantics.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash,
    PartialOrd, Ord,
)]
pub struct WeekSlot {
    pub day: DayOfWeek,
    pub slot: TimeSlot,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash)]
pub struct TeacherOffSlot {
    pub teacher_id: TeacherId,
    pub day: DayOfWeek,
    pub slot: TimeSlot,
}

#[derive(
    Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum CourseType {
    #[default]
    OneOnOne,
    Online,
    Class,
}

impl CourseType {
    pub fn counts_against_capacity(&self) -> bool {
        !matches!(self, CourseType::Online)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct CourseArrangement {
    pub subject: String,
    #[serde(default)]
    pub course_type: CourseType,
    pub hours: u32,
    #[serde(default)]
    pub remark: Option<String>,
}

/// "If this slot is used, it must carry exactly this subject." Never forces
/// the slot to be used.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq)]
pub struct SlotFilter {
    pub day: DayOfWeek,
    pub slot: TimeSlot,
    pub subject: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct SubjectTeacher {
    pub subject: String,
    pub teacher_id: TeacherId,
}

/// One expanded course chunk bound to a concrete location. For two-slot
/// placements the slots are consecutive.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq)]
pub struct Placement {
    pub subject: String,
    pub course_type: CourseType,
    #[serde(default)]
    pub remark: Option<String>,
    pub day: DayOfWeek,
    pub slots: Vec<TimeSlot>,
}

impl Placement {
    pub fn hours(&self) -> u32 {
        self.slots.len() as u32
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq)]
pub struct ScheduleItem {
    pub subject: String,
    pub course_type: CourseType,
    #[serde(default)]
    pub remark: Option<String>,
    pub day: DayOfWeek,
    pub slot: TimeSlot,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq)]
pub struct PlacementSummary {
    pub subject: String,
    pub course_type: CourseType,
    pub hours: u32,
    pub day: DayOfWeek,
    pub slots: Vec<TimeSlot>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq)]
pub struct ScheduleOption {
    pub id: u32,
    pub items: Vec<ScheduleItem>,
    pub summary: Vec<PlacementSummary>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq)]
pub struct ScheduleRow {
    pub student_id: StudentId,
    #[serde(default)]
    pub teacher_id: Option<TeacherId>,
    pub subject: String,
    pub day: DayOfWeek,
    pub slot: TimeSlot,
    pub week: WeekKey,
    pub course_type: CourseType,
    #[serde(default)]
    pub remark: Option<String>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct CapacityCheck {
    pub allowed: bool,
    pub at_ceiling: bool,
    pub current_count: u32,
}

#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum PairRule {
    /// Any two consecutive slots inside a run.
    #[default]
    FreeForm,
    /// Only the windows enumerated in `FIXED_DOUBLE_PAIRS`.
    FixedPairs,
}

#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum SameDayRepeat {
    #[default]
    Allow,
    /// At most one placement per subject per day.
    ForbidPerSubject,
}

#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Default,
)]
pub struct SearchPolicy {
    #[serde(default)]
    pub pair_rule: PairRule,
    #[serde(default)]
    pub same_day_repeat: SameDayRepeat,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct GenerateParams {
    #[serde(default = "default_max_solutions")]
    pub max_solutions: usize,
    #[serde(default = "default_max_nodes")]
    pub max_nodes: u64,
    #[serde(default)]
    pub time_budget_ms: Option<u64>,
    #[serde(default)]
    pub policy: SearchPolicy,
}

fn default_max_solutions() -> usize {
    12
}

fn default_max_nodes() -> u64 {
    200_000
}

impl Default for GenerateParams {
    fn default() -> Self {
        Self {
            max_solutions: default_max_solutions(),
            max_nodes: default_max_nodes(),
            time_budget_ms: None,
            policy: SearchPolicy::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct GenerateRequest {
    pub student_id: StudentId,
    pub week: WeekKey,
    pub arrangements: Vec<CourseArrangement>,
    #[serde(default)]
    pub filters: Vec<SlotFilter>,
    #[serde(default)]
    pub params: GenerateParams,
}

/// Store reads the engine consumes. Read fresh per generation request.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct WeekSnapshot {
    #[serde(default)]
    pub available: Vec<WeekSlot>,
    #[serde(default)]
    pub teacher_off: Vec<TeacherOffSlot>,
    #[serde(default)]
    pub existing: Vec<ScheduleRow>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct PlanEnvelope {
    pub request: GenerateRequest,
    pub snapshot: WeekSnapshot,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct GenerateReply {
    pub success: bool,
    pub options: Vec<ScheduleOption>,
    pub message: String,
    pub stats: serde_json::Value,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct ApplyRequest {
    pub student_id: StudentId,
    pub week: WeekKey,
    pub option: ScheduleOption,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct ApplyReply {
    pub success: bool,
    pub message: String,
}
