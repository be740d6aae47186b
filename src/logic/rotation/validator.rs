use super::classify_rotation_group;
use crate::models::{CropIdentity, RotationCheckResult, RotationGroup, Severity};
use tracing::debug;

pub const SAME_CROP_REASON: &str =
    "Never plant the same crop twice in a row - increases disease and pest pressure";

/// A rule that fires when both crops of a succession fall in `group`.
struct FamilyRepeat {
    group: RotationGroup,
    severity: Severity,
    reason: &'static str,
}

/// Checked in order after the same-crop rule; the first match decides.
const FAMILY_REPEATS: &[FamilyRepeat] = &[
    FamilyRepeat {
        group: RotationGroup::Solanaceae,
        severity: Severity::Error,
        reason: "Avoid nightshades (tomato/pepper/eggplant/potato) after each other - wait 2-3 years",
    },
    FamilyRepeat {
        group: RotationGroup::Brassica,
        severity: Severity::Error,
        reason: "Avoid brassicas after brassicas - clubroot and other diseases accumulate",
    },
    FamilyRepeat {
        group: RotationGroup::HeavyFeeder,
        severity: Severity::Warning,
        reason: "Heavy feeders deplete soil nutrients - rotate with legumes or light feeders",
    },
    FamilyRepeat {
        group: RotationGroup::Cucurbit,
        severity: Severity::Warning,
        reason: "Cucurbits are susceptible to similar diseases - rotate to different family",
    },
];

/// Validate planting `next` on a field whose previous crop was `prev`.
///
/// A missing previous crop, or one with an empty name, means this is the
/// first planting and is always acceptable.
pub fn check_rotation(prev: Option<&CropIdentity>, next: &CropIdentity) -> RotationCheckResult {
    let prev = match prev {
        Some(p) if !p.name.is_empty() => p,
        _ => return RotationCheckResult::ok(),
    };

    if prev.same_crop(next) {
        debug!(crop = %next.name, "Same crop planted back-to-back");
        return RotationCheckResult::violation(Severity::Error, SAME_CROP_REASON);
    }

    let prev_group = classify_rotation_group(&prev.name, prev.category.as_deref());
    let next_group = classify_rotation_group(&next.name, next.category.as_deref());

    if prev_group != next_group {
        return RotationCheckResult::ok();
    }

    match FAMILY_REPEATS.iter().find(|rule| rule.group == prev_group) {
        Some(rule) => {
            debug!(
                prev = %prev.name,
                next = %next.name,
                group = %prev_group,
                severity = %rule.severity,
                "Rotation family repeated"
            );
            RotationCheckResult::violation(rule.severity, rule.reason)
        }
        None => RotationCheckResult::ok(),
    }
}
