use types::{Placement, PlacementSummary, ScheduleItem, ScheduleOption};

/// Expands placements into one schedule item per occupied slot, plus the
/// compact per-placement summary shown in the option picker.
pub fn format_solution(placements: &[Placement]) -> (Vec<ScheduleItem>, Vec<PlacementSummary>) {
    let mut items = Vec::new();
    let mut summary = Vec::with_capacity(placements.len());

    for p in placements {
        for &slot in &p.slots {
            items.push(ScheduleItem {
                subject: p.subject.clone(),
                course_type: p.course_type.clone(),
                remark: p.remark.clone(),
                day: p.day,
                slot,
            });
        }
        summary.push(PlacementSummary {
            subject: p.subject.clone(),
            course_type: p.course_type.clone(),
            hours: p.hours(),
            day: p.day,
            slots: p.slots.clone(),
        });
    }

    (items, summary)
}

pub fn build_option(rank: u32, placements: &[Placement]) -> ScheduleOption {
    let (items, summary) = format_solution(placements);
    ScheduleOption {
        id: rank,
        items,
        summary,
    }
}
