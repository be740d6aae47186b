use crate::models::RotationGroup;

/// Keyword sets checked in order; the first group with a keyword contained in
/// the lower-cased crop name wins.
///
/// Order matters: "cabbage" is listed for both heavy feeders and brassicas and
/// "tomato" for both heavy feeders and nightshades, and the heavy-feeder entry
/// claims both.
const KEYWORD_GROUPS: &[(RotationGroup, &[&str])] = &[
    (
        RotationGroup::Legume,
        &["peas", "beans", "green beans", "clover"],
    ),
    (
        RotationGroup::HeavyFeeder,
        &["tomato", "corn", "squash", "pumpkin", "cabbage"],
    ),
    (
        RotationGroup::Brassica,
        &["cabbage", "broccoli", "kale", "cauliflower", "brussels"],
    ),
    (
        RotationGroup::RootVegetable,
        &["carrot", "radish", "beet", "turnip", "parsnip"],
    ),
    (
        RotationGroup::Cucurbit,
        &["cucumber", "melon", "zucchini", "watermelon"],
    ),
    (
        RotationGroup::Allium,
        &["onion", "garlic", "leek", "shallot"],
    ),
    (
        RotationGroup::Solanaceae,
        &["pepper", "eggplant", "potato", "tomato"],
    ),
];

/// Classify a crop into its rotation group.
///
/// Total over all names: anything without a matching keyword is a light
/// feeder. `_category` is accepted so callers can pass what they have, but
/// it does not influence the result.
pub fn classify_rotation_group(crop_name: &str, _category: Option<&str>) -> RotationGroup {
    let name = crop_name.to_lowercase();

    KEYWORD_GROUPS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| name.contains(k)))
        .map(|(group, _)| *group)
        .unwrap_or(RotationGroup::LightFeeder)
}
