use plan_core::PlanError;
use types::{CourseArrangement, CourseType};

/// A 1- or 2-slot atomic scheduling unit derived from one arrangement's hour
/// count. Two-slot chunks must land on consecutive slots.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CourseChunk {
    pub subject: String,
    pub course_type: CourseType,
    pub remark: Option<String>,
    pub size: u8,
}

/// Splits each arrangement into `hours / 2` double chunks followed by a
/// single-hour remainder chunk when `hours` is odd. Arrangement order is
/// preserved; chunk sizes always sum back to the original hours.
pub fn expand_arrangements(
    arrangements: &[CourseArrangement],
) -> Result<Vec<CourseChunk>, PlanError> {
    let mut chunks = Vec::new();
    for a in arrangements {
        if a.hours == 0 {
            return Err(PlanError::Configuration(format!(
                "arrangement {} has hours=0",
                a.subject
            )));
        }
        for _ in 0..a.hours / 2 {
            chunks.push(CourseChunk {
                subject: a.subject.clone(),
                course_type: a.course_type.clone(),
                remark: a.remark.clone(),
                size: 2,
            });
        }
        if a.hours % 2 == 1 {
            chunks.push(CourseChunk {
                subject: a.subject.clone(),
                course_type: a.course_type.clone(),
                remark: a.remark.clone(),
                size: 1,
            });
        }
    }
    Ok(chunks)
}
