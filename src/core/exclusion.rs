use crate::models::{Match, Swipe};
use std::collections::HashSet;

/// Build the set of user ids hidden from `viewer_id`
///
/// The set is the viewer itself, the other party of every match the viewer
/// belongs to, and the target of every swipe the viewer made. Ids that show
/// up in several sources collapse into one entry.
pub fn build_exclusion_set(viewer_id: &str, matches: &[Match], swipes: &[Swipe]) -> HashSet<String> {
    let mut excluded = HashSet::with_capacity(1 + matches.len() + swipes.len());
    excluded.insert(viewer_id.to_string());

    for m in matches {
        excluded.extend(m.others(viewer_id).map(str::to_string));
    }

    // Only the viewer's own swipes count
    excluded.extend(
        swipes
            .iter()
            .filter(|s| s.swiper_id == viewer_id)
            .map(|s| s.target_id.clone()),
    );

    tracing::debug!(
        "Exclusion set for {}: {} ids ({} matches, {} swipes)",
        viewer_id,
        excluded.len(),
        matches.len(),
        swipes.len()
    );

    excluded
}
