//! Season tag matching.
//!
//! Item season tags are free text and may be compound (`spring/fall`). A tag
//! matches a target season when either string contains the other, compared
//! case-sensitively. This makes the target `fall` match an item tagged only
//! `spring/fall`, and the target `spring/fall` match an item tagged `spring`.
//! Blank tags and blank targets never match.

pub fn season_matches(item_season: &str, target_season: &str) -> bool {
    if item_season.trim().is_empty() || target_season.trim().is_empty() {
        return false;
    }

    item_season.contains(target_season) || target_season.contains(item_season)
}

pub fn matches_any<S: AsRef<str>>(item_seasons: &[S], target_season: &str) -> bool {
    item_seasons.iter().any(|tag| season_matches(tag.as_ref(), target_season))
}

/// Whether outerwear belongs in an outfit for this season. Case-sensitive,
/// like tag matching.
pub fn is_layering_season(season: &str) -> bool {
    ["fall", "winter", "spring"].iter().any(|layered| season.contains(layered))
}
