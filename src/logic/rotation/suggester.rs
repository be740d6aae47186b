use super::classify_rotation_group;
use crate::models::{CropIdentity, RotationGroup, SuggestionEntry};

pub const FIRST_PLANTING_REASON: &str = "Any crop suitable for first planting";
pub const ACCEPTABLE_REASON: &str = "Acceptable rotation";

const PREFERRED_SCORE: u8 = 2;
const ACCEPTABLE_SCORE: u8 = 1;

/// Groups that should ideally follow a given group, and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdealSuccessors {
    pub groups: &'static [RotationGroup],
    pub reason: &'static str,
}

impl IdealSuccessors {
    pub fn prefers(&self, group: RotationGroup) -> bool {
        self.groups.contains(&group)
    }
}

pub fn ideal_successors(group: RotationGroup) -> IdealSuccessors {
    use RotationGroup::*;

    match group {
        HeavyFeeder => IdealSuccessors {
            groups: &[Legume, LightFeeder],
            reason: "Legumes restore nitrogen; light feeders allow soil recovery",
        },
        Legume => IdealSuccessors {
            groups: &[HeavyFeeder, Brassica],
            reason: "Use nitrogen fixed by legumes for heavy feeders",
        },
        Brassica => IdealSuccessors {
            groups: &[Legume, RootVegetable],
            reason: "Break brassica disease cycle with different families",
        },
        LightFeeder => IdealSuccessors {
            groups: &[Legume, HeavyFeeder],
            reason: "Build soil with legumes or utilize recovered nutrients",
        },
        Solanaceae => IdealSuccessors {
            groups: &[Legume, RootVegetable],
            reason: "Break solanaceae disease cycle - wait 2-3 years before repeating",
        },
        Cucurbit => IdealSuccessors {
            groups: &[Legume, RootVegetable],
            reason: "Restore soil and break cucurbit pest cycles",
        },
        Allium => IdealSuccessors {
            groups: &[HeavyFeeder, Legume],
            reason: "Alliums are light feeders - follow with nitrogen users",
        },
        RootVegetable => IdealSuccessors {
            groups: &[Legume, Brassica],
            reason: "Build soil with legumes or plant brassicas",
        },
    }
}

/// Rank `candidates` as follow-ups to `prev`, best first.
///
/// Candidates are classified by name alone. Equal scores keep the order
/// they were given in.
pub fn suggest_next_crops<S: AsRef<str>>(
    prev: Option<&CropIdentity>,
    candidates: &[S],
) -> Vec<SuggestionEntry> {
    let prev = match prev {
        Some(p) if !p.name.is_empty() => p,
        _ => {
            return candidates
                .iter()
                .map(|c| {
                    let crop: &str = c.as_ref();
                    SuggestionEntry::new(crop, ACCEPTABLE_SCORE, FIRST_PLANTING_REASON)
                })
                .collect()
        }
    };

    let successors = ideal_successors(classify_rotation_group(
        &prev.name,
        prev.category.as_deref(),
    ));

    let mut suggestions: Vec<SuggestionEntry> = candidates
        .iter()
        .map(|c| {
            let crop: &str = c.as_ref();
            if successors.prefers(classify_rotation_group(crop, None)) {
                SuggestionEntry::new(crop, PREFERRED_SCORE, successors.reason)
            } else {
                SuggestionEntry::new(crop, ACCEPTABLE_SCORE, ACCEPTABLE_REASON)
            }
        })
        .collect();

    // sort_by is stable
    suggestions.sort_by(|a, b| b.score.cmp(&a.score));
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crops(entries: &[SuggestionEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.crop.as_str()).collect()
    }

    #[test]
    fn every_group_has_two_successors() {
        for group in RotationGroup::all() {
            let successors = ideal_successors(*group);
            assert_eq!(successors.groups.len(), 2, "{:?}", group);
            assert!(!successors.reason.is_empty());
        }
    }

    #[test]
    fn no_previous_crop_keeps_pool_order() {
        let result = suggest_next_crops(None, &["Kale", "Corn", "Peas"]);
        assert_eq!(crops(&result), vec!["Kale", "Corn", "Peas"]);
        assert!(result.iter().all(|e| e.score == 1));
        assert!(result.iter().all(|e| e.reason == "Any crop suitable for first planting"));
    }

    #[test]
    fn empty_previous_name_counts_as_first_planting() {
        let result = suggest_next_crops(Some(&CropIdentity::new("")), &["Corn"]);
        assert_eq!(result[0].reason, FIRST_PLANTING_REASON);
    }

    #[test]
    fn after_corn_prefers_legumes_and_light_feeders() {
        let prev = CropIdentity::new("Corn");
        let result = suggest_next_crops(Some(&prev), &["Peas", "Carrots", "Corn"]);

        assert_eq!(crops(&result), vec!["Peas", "Carrots", "Corn"]);
        assert_eq!(result[0].score, 2);
        assert_eq!(result[0].reason, ideal_successors(RotationGroup::HeavyFeeder).reason);
        assert_eq!(result[1].score, 1);
        assert_eq!(result[1].reason, ACCEPTABLE_REASON);
        assert_eq!(result[2].score, 1);
    }

    #[test]
    fn preferred_candidates_move_ahead_stably() {
        let prev = CropIdentity::new("Wheat");
        let pool = ["Carrots", "Corn", "Onions", "Peas", "Squash", "Kale"];
        let result = suggest_next_crops(Some(&prev), &pool);

        // light feeder -> legumes or heavy feeders
        assert_eq!(
            crops(&result),
            vec!["Corn", "Peas", "Squash", "Carrots", "Onions", "Kale"]
        );
        assert!(result[..3].iter().all(SuggestionEntry::is_preferred));
        assert!(!result[3..].iter().any(SuggestionEntry::is_preferred));
    }

    #[test]
    fn after_peas_prefers_heavy_feeders_and_brassicas() {
        let prev = CropIdentity::new("Peas").with_category("Legume");
        let result = suggest_next_crops(
            Some(&prev),
            &["Beans", "Broccoli", "Squash", "Cabbage", "Carrots"],
        );
        assert_eq!(
            crops(&result),
            vec!["Broccoli", "Squash", "Cabbage", "Beans", "Carrots"]
        );
    }

    #[test]
    fn empty_pool_yields_nothing() {
        let empty: [&str; 0] = [];
        assert!(suggest_next_crops(Some(&CropIdentity::new("Corn")), &empty).is_empty());
    }

    #[test]
    fn accepts_owned_strings() {
        let pool = vec!["Garlic".to_string(), "Beans".to_string()];
        let result = suggest_next_crops(Some(&CropIdentity::new("Kale")), &pool);
        assert_eq!(crops(&result), vec!["Beans", "Garlic"]);
    }
}
