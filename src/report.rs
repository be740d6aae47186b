use fieldmap::logic::analytics::{CropShare, FarmStats, FieldCompliance, PlantingReview};
use fieldmap::logic::planner::FieldTimeline;
use fieldmap::models::{Field, RotationCheckResult, RotationGroup, SuggestionEntry};
use serde::Serialize;
use std::fmt::Write;

const NAME_WIDTH: usize = 16;
const CELL_WIDTH: usize = 22;

/// Everything shown on the dashboard.
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub farm: String,
    pub stats: FarmStats,
    pub distribution: Vec<CropShare>,
    pub compliance: Vec<FieldCompliance>,
}

fn bar(percentage: u8) -> String {
    let filled = (percentage.min(100) as usize) / 5;
    format!("{}{}", "█".repeat(filled), "░".repeat(20 - filled))
}

fn check_line(check: &RotationCheckResult) -> String {
    match (&check.severity, &check.reason) {
        (Some(severity), Some(reason)) => format!("{} {}: {}", severity.symbol(), severity, reason),
        _ => "✓ ok".to_string(),
    }
}

pub fn classification(crop: &str, group: RotationGroup) -> String {
    format!("{}: {} ({})\n", crop, group, group.label())
}

pub fn rotation_check(prev: Option<&str>, next: &str, check: &RotationCheckResult) -> String {
    let mut out = String::new();
    match prev {
        Some(prev) => {
            let _ = writeln!(out, "{} → {}", prev, next);
        }
        None => {
            let _ = writeln!(out, "{} (first planting)", next);
        }
    }
    let _ = writeln!(out, "  {}", check_line(check));
    out
}

pub fn suggestions(after: Option<&str>, entries: &[SuggestionEntry]) -> String {
    let mut out = String::new();
    match after {
        Some(after) => {
            let _ = writeln!(out, "After {}:", after);
        }
        None => {
            let _ = writeln!(out, "First planting:");
        }
    }
    if entries.is_empty() {
        let _ = writeln!(out, "  (no candidates)");
    }
    for entry in entries {
        let marker = if entry.is_preferred() { "★" } else { " " };
        let _ = writeln!(
            out,
            "  {} {:<width$} {}",
            marker,
            entry.crop,
            entry.reason,
            width = NAME_WIDTH
        );
    }
    out
}

pub fn compliance_table(rows: &[FieldCompliance]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Rotation compliance");
    for row in rows {
        let _ = writeln!(
            out,
            "  {:<width$} {} {:>3}%  {}",
            row.field,
            bar(row.score),
            row.score,
            row.status,
            width = NAME_WIDTH
        );
    }
    if rows.iter().any(|r| r.status.needs_review()) {
        let _ = writeln!(
            out,
            "  Fields below 75% should review their rotation patterns."
        );
    }
    out
}

pub fn field_list(fields: &[Field], year: i32) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4} {:<width$} {:>8} {:<14} {:<12} {:>5}",
        "ID",
        "Name",
        "Acres",
        format!("Crop {}", year),
        "Soil",
        "Score",
        width = NAME_WIDTH
    );
    for field in fields {
        let crop = field
            .current_crop(year)
            .map(|r| r.crop_name.as_str())
            .unwrap_or("fallow");
        let soil = field.soil_type.map(|s| s.as_str()).unwrap_or("-");
        let status = if field.is_active { "" } else { " (inactive)" };
        let _ = writeln!(
            out,
            "{:<4} {:<width$} {:>8.1} {:<14} {:<12} {:>4}%{}",
            field.id,
            field.name,
            field.size_acres,
            crop,
            soil,
            field.compliance_score(),
            status,
            width = NAME_WIDTH
        );
    }
    out
}

pub fn field_detail(field: &Field, history: &[PlantingReview], year: i32) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]", field.name, field.id);
    let _ = writeln!(
        out,
        "  {} acres ({} ha){}",
        field.size_acres,
        field.size_hectares(),
        if field.is_active { "" } else { ", inactive" }
    );

    let mut detail = |label: &str, value: Option<String>| {
        if let Some(value) = value {
            let _ = writeln!(out, "  {:<18} {}", label, value);
        }
    };
    detail("Soil type", field.soil_type.map(|s| s.to_string()));
    detail("Soil pH", field.soil_ph.map(|v| v.to_string()));
    detail(
        "Organic matter",
        field.organic_matter_percent.map(|v| format!("{}%", v)),
    );
    detail("Irrigation", field.irrigation_type.map(|i| i.to_string()));
    detail("Drainage", field.drainage_quality.map(|d| d.to_string()));
    detail(
        "Last soil test",
        field.last_soil_test_date.map(|d| d.to_string()),
    );
    detail(
        "Current crop",
        field.current_crop(year).map(|r| r.crop_name.clone()),
    );
    detail("Notes", field.notes.clone());

    let _ = writeln!(out);
    let _ = writeln!(out, "Planting history");
    if history.is_empty() {
        let _ = writeln!(out, "  (none recorded)");
    }
    for review in history.iter().rev() {
        let _ = writeln!(
            out,
            "  {}  {:<width$} {:<15} {:<14} {}",
            review.year,
            review.crop,
            review.group.label(),
            review.yield_display.as_deref().unwrap_or("-"),
            check_line(&review.check),
            width = NAME_WIDTH
        );
    }

    if !field.planned.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Planned");
        let mut planned: Vec<_> = field.planned.iter().collect();
        planned.sort_by_key(|r| r.year);
        for record in planned {
            let _ = writeln!(out, "  {}  {}", record.year, record.crop_name);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Rotation compliance: {}%", field.compliance_score());
    out
}

pub fn plan(years: &[i32], timelines: &[FieldTimeline]) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<width$}", "Field", width = NAME_WIDTH);
    for year in years {
        let _ = write!(out, " {:<width$}", year, width = CELL_WIDTH);
    }
    let _ = writeln!(out);

    for timeline in timelines {
        let _ = write!(out, "{:<width$}", timeline.field, width = NAME_WIDTH);
        for cell in &timeline.cells {
            let text = match (&cell.crop, &cell.check) {
                (Some(crop), Some(check)) => {
                    let flag = match check.severity {
                        Some(severity) => format!(" {}", severity.symbol()),
                        None => String::new(),
                    };
                    let planned = if cell.planned { "*" } else { "" };
                    format!("{}{}{}", crop, planned, flag)
                }
                _ => "·".to_string(),
            };
            let _ = write!(out, " {:<width$}", text, width = CELL_WIDTH);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "* planned   ⚠ warning   ✗ error");

    let checks: Vec<&RotationCheckResult> = timelines
        .iter()
        .flat_map(|t| t.cells.iter().filter_map(|c| c.check.as_ref()))
        .filter(|check| !check.valid)
        .collect();
    if !checks.is_empty() {
        let errors = checks.iter().filter(|check| check.is_error()).count();
        let _ = writeln!(
            out,
            "{} error(s), {} warning(s)",
            errors,
            checks.len() - errors
        );
    }

    for timeline in timelines {
        for cell in &timeline.cells {
            if let (Some(crop), Some(check)) = (&cell.crop, &cell.check) {
                if !check.valid {
                    let _ = writeln!(
                        out,
                        "{} {}: {} - {}",
                        timeline.field,
                        cell.year,
                        crop,
                        check_line(check)
                    );
                }
            }
        }
    }

    for timeline in timelines {
        if let Some(year) = timeline.next_open_year {
            let preferred: Vec<&str> = timeline
                .suggestions
                .iter()
                .filter(|s| s.is_preferred())
                .map(|s| s.crop.as_str())
                .collect();
            if preferred.is_empty() {
                continue;
            }
            let after = timeline
                .after_crop
                .as_deref()
                .map(|c| format!(" after {}", c))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "{} - {}{}: consider {}",
                timeline.field,
                year,
                after,
                preferred.join(", ")
            );
        }
    }
    out
}

pub fn dashboard(dashboard: &Dashboard) -> String {
    let stats = &dashboard.stats;
    let mut out = String::new();
    let _ = writeln!(out, "{} - {}", dashboard.farm, stats.year);
    let _ = writeln!(out, "  Fields             {}", stats.total_fields);
    let _ = writeln!(out, "  Total acres        {:.1}", stats.total_acres);
    let _ = writeln!(out, "  Planted acres      {:.1}", stats.planted_acres);
    let _ = writeln!(out, "  Fallow acres       {:.1}", stats.fallow_acres);
    let _ = writeln!(out, "  Crop diversity     {}", stats.crop_diversity);
    let _ = writeln!(out, "  Rotation score     {}%", stats.rotation_compliance);
    let _ = writeln!(out);

    let _ = writeln!(out, "Crop distribution");
    if dashboard.distribution.is_empty() {
        let _ = writeln!(out, "  (nothing planted)");
    }
    for share in &dashboard.distribution {
        let _ = writeln!(
            out,
            "  {:<width$} {} {:>3}%  {:.1} ac",
            share.crop,
            bar(share.percentage),
            share.percentage,
            share.acres,
            width = NAME_WIDTH
        );
    }
    let _ = writeln!(out);
    out.push_str(&compliance_table(&dashboard.compliance));
    out
}

pub fn problems(problems: &[String]) -> String {
    if problems.is_empty() {
        return "Config OK\n".to_string();
    }
    let mut out = format!("{} problem(s) found:\n", problems.len());
    for problem in problems {
        let _ = writeln!(out, "  - {}", problem);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmap::logic::analytics::ComplianceStatus;
    use fieldmap::logic::RotationPlanner;
    use fieldmap::models::{PlantingRecord, Severity};

    #[test]
    fn bar_scales_to_twenty_cells() {
        assert_eq!(bar(100).chars().filter(|c| *c == '█').count(), 20);
        assert_eq!(bar(50).chars().filter(|c| *c == '█').count(), 10);
        assert_eq!(bar(0).chars().count(), 20);
    }

    #[test]
    fn rotation_check_shows_reason() {
        let check = RotationCheckResult::violation(Severity::Warning, "too hungry");
        let text = rotation_check(Some("Corn"), "Squash", &check);
        assert!(text.contains("Corn → Squash"));
        assert!(text.contains("warning: too hungry"));

        let text = rotation_check(None, "Corn", &RotationCheckResult::ok());
        assert!(text.contains("first planting"));
        assert!(text.contains("✓ ok"));
    }

    #[test]
    fn suggestions_star_preferred_crops() {
        let entries = vec![
            SuggestionEntry::new("Peas", 2, "Legumes restore nitrogen"),
            SuggestionEntry::new("Carrots", 1, "Acceptable rotation"),
        ];
        let text = suggestions(Some("Corn"), &entries);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "After Corn:");
        assert!(lines[1].contains("★ Peas"));
        assert!(!lines[2].contains('★'));
    }

    #[test]
    fn compliance_table_flags_low_scores() {
        let rows = vec![FieldCompliance {
            field_id: "4".into(),
            field: "West Field".into(),
            score: 60,
            status: ComplianceStatus::NeedsImprovement,
        }];
        let text = compliance_table(&rows);
        assert!(text.contains("60%"));
        assert!(text.contains("should review"));
    }

    #[test]
    fn plan_counts_errors_and_warnings() {
        let field = Field::new("3", "East Field", 32.8)
            .with_planting(PlantingRecord::new("Broccoli", 2024))
            .with_planned(PlantingRecord::new("Kale", 2025))
            .with_planned(PlantingRecord::new("Corn", 2026))
            .with_planned(PlantingRecord::new("Squash", 2027));
        let planner = RotationPlanner::new(2024, 4);
        let timelines = planner.plan_farm(&[field], &[]);

        let text = plan(&planner.years(), &timelines);
        assert!(text.contains("1 error(s), 1 warning(s)"));
        assert!(text.contains("Kale*"));

        let quiet = plan(&planner.years(), &planner.plan_farm(&[], &[]));
        assert!(!quiet.contains("error(s)"));
    }

    #[test]
    fn problems_lists_each_entry() {
        assert_eq!(problems(&[]), "Config OK\n");
        let text = problems(&["a".into(), "b".into()]);
        assert!(text.starts_with("2 problem(s)"));
        assert!(text.contains("  - b"));
    }
}
