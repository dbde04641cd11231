use crate::models::{UserProfile, Tier};
use crate::core::distance::{haversine_distance, is_within_radius, DistanceUnit};
use std::collections::HashSet;

/// Default radius for the "nearby" tier
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 5.0;

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub profiles: Vec<UserProfile>,
    pub total_candidates: usize,
    pub same_gym: usize,
    pub nearby: usize,
    pub same_city: usize,
    /// False when the viewer profile was missing and no tiering happened
    pub tiered: bool,
}

/// Gym-partner candidate filter
///
/// # Tiers
/// 1. Same gym address (exact, case-sensitive)
/// 2. Gyms within the nearby radius
/// 3. Same city
///
/// Every candidate lands in the first tier it qualifies for. The output is the
/// concatenation of the three tiers, each in source order.
#[derive(Debug, Clone)]
pub struct Matcher {
    nearby_radius_km: f64,
}

impl Matcher {
    pub fn new(nearby_radius_km: f64) -> Self {
        Self { nearby_radius_km }
    }

    pub fn nearby_radius_km(&self) -> f64 {
        self.nearby_radius_km
    }

    /// Classify a candidate against the viewer, `None` if no tier applies
    pub fn classify(&self, viewer: &UserProfile, candidate: &UserProfile) -> Option<Tier> {
        if let (Some(mine), Some(theirs)) = (viewer.gym(), candidate.gym()) {
            if mine == theirs {
                return Some(Tier::SameGym);
            }
        }

        if let (Some(mine), Some(theirs)) = (viewer.gym_location(), candidate.gym_location()) {
            let distance_km = haversine_distance(mine, theirs, DistanceUnit::Kilometers);
            if is_within_radius(distance_km, self.nearby_radius_km) {
                return Some(Tier::Nearby);
            }
        }

        match (viewer.home_city(), candidate.home_city()) {
            (Some(mine), Some(theirs)) if mine == theirs => Some(Tier::SameCity),
            _ => None,
        }
    }

    /// Rank gym-partner candidates for a viewer
    ///
    /// # Arguments
    /// * `viewer` - The viewer's profile, if it could be found
    /// * `candidates` - Every profile in the store, in store order
    /// * `excluded` - Ids never to return (self, matched, swiped)
    ///
    /// Without a viewer profile there is nothing to tier against, so every
    /// non-excluded candidate is returned in store order.
    pub fn find_partners(
        &self,
        viewer: Option<&UserProfile>,
        candidates: Vec<UserProfile>,
        excluded: &HashSet<String>,
    ) -> MatchResult {
        let total_candidates = candidates.len();
        let mut emitted: HashSet<String> = HashSet::new();

        let eligible = candidates
            .into_iter()
            .filter(|profile| !excluded.contains(&profile.user_id))
            .filter(|profile| emitted.insert(profile.user_id.clone()));

        let Some(viewer) = viewer else {
            let profiles: Vec<UserProfile> = eligible.collect();
            return MatchResult {
                profiles,
                total_candidates,
                same_gym: 0,
                nearby: 0,
                same_city: 0,
                tiered: false,
            };
        };

        let mut same_gym = Vec::new();
        let mut nearby = Vec::new();
        let mut same_city = Vec::new();

        for profile in eligible {
            match self.classify(viewer, &profile) {
                Some(Tier::SameGym) => same_gym.push(profile),
                Some(Tier::Nearby) => nearby.push(profile),
                Some(Tier::SameCity) => same_city.push(profile),
                None => {}
            }
        }

        let (gym_count, nearby_count, city_count) = (same_gym.len(), nearby.len(), same_city.len());

        let mut profiles = same_gym;
        profiles.extend(nearby);
        profiles.extend(same_city);

        MatchResult {
            profiles,
            total_candidates,
            same_gym: gym_count,
            nearby: nearby_count,
            same_city: city_count,
            tiered: true,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(DEFAULT_NEARBY_RADIUS_KM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn create_profile(
        id: &str,
        gym: Option<&str>,
        location: Option<(f64, f64)>,
        city: Option<&str>,
    ) -> UserProfile {
        UserProfile {
            user_id: id.to_string(),
            name: format!("User {}", id),
            gym_address: gym.map(str::to_string),
            gym_latitude: location.map(|(lat, _)| lat),
            gym_longitude: location.map(|(_, lon)| lon),
            city: city.map(str::to_string),
            dietary_preference: None,
            attendance: BTreeMap::new(),
            streak: None,
            last_check_in: None,
        }
    }

    fn ids(result: &MatchResult) -> Vec<&str> {
        result.profiles.iter().map(|p| p.user_id.as_str()).collect()
    }

    fn only_self(id: &str) -> HashSet<String> {
        HashSet::from([id.to_string()])
    }

    #[test]
    fn test_tier_order() {
        let matcher = Matcher::default();
        let viewer = create_profile("me", Some("Iron Temple"), Some((52.5200, 13.4050)), Some("Berlin"));

        let candidates = vec![
            create_profile("city", None, None, Some("Berlin")),
            create_profile("near", Some("Other Gym"), Some((52.5210, 13.4060)), None),
            create_profile("gym", Some("Iron Temple"), None, None),
            create_profile("none", Some("Far Gym"), Some((48.1351, 11.5820)), Some("Munich")),
        ];

        let result = matcher.find_partners(Some(&viewer), candidates, &only_self("me"));

        assert_eq!(ids(&result), vec!["gym", "near", "city"]);
        assert_eq!((result.same_gym, result.nearby, result.same_city), (1, 1, 1));
        assert!(result.tiered);
    }

    #[test]
    fn test_first_matching_tier_wins() {
        let matcher = Matcher::default();
        let viewer = create_profile("me", Some("Iron Temple"), Some((0.0, 0.0)), Some("Berlin"));
        let everything = create_profile("all", Some("Iron Temple"), Some((0.0, 0.0)), Some("Berlin"));

        assert_eq!(matcher.classify(&viewer, &everything), Some(Tier::SameGym));
    }

    #[test]
    fn test_gym_address_is_case_sensitive() {
        let matcher = Matcher::default();
        let viewer = create_profile("me", Some("Iron Temple"), None, None);
        let other = create_profile("x", Some("iron temple"), None, None);

        assert_eq!(matcher.classify(&viewer, &other), None);
    }

    #[test]
    fn test_empty_strings_never_match() {
        let matcher = Matcher::default();
        let viewer = create_profile("me", Some(""), None, Some(""));
        let other = create_profile("x", Some(""), None, Some(""));

        assert_eq!(matcher.classify(&viewer, &other), None);
    }

    #[test]
    fn test_nearby_keeps_scan_order() {
        let matcher = Matcher::default();
        let viewer = create_profile("me", None, Some((40.7128, -74.0060)), None);

        let candidates = vec![
            create_profile("farther", None, Some((40.7400, -74.0060)), None), // ~3km
            create_profile("closer", None, Some((40.7138, -74.0060)), None),  // ~100m
        ];

        let result = matcher.find_partners(Some(&viewer), candidates, &only_self("me"));
        assert_eq!(ids(&result), vec!["farther", "closer"]);
    }

    #[test]
    fn test_same_point_is_nearby() {
        let matcher = Matcher::default();
        let viewer = create_profile("me", None, Some((0.0, 0.0)), None);
        let other = create_profile("x", None, Some((0.0, 0.0)), None);

        assert_eq!(matcher.classify(&viewer, &other), Some(Tier::Nearby));
    }

    #[test]
    fn test_missing_viewer_falls_back_to_untiered() {
        let matcher = Matcher::default();
        let candidates = vec![
            create_profile("a", None, None, None),
            create_profile("me", None, None, None),
            create_profile("b", Some("Gym"), None, Some("Berlin")),
        ];

        let result = matcher.find_partners(None, candidates, &only_self("me"));
        assert_eq!(ids(&result), vec!["a", "b"]);
        assert!(!result.tiered);
        assert_eq!(result.total_candidates, 3);
    }

    #[test]
    fn test_duplicate_documents_emitted_once() {
        let matcher = Matcher::default();
        let viewer = create_profile("me", None, None, Some("Berlin"));
        let candidates = vec![
            create_profile("a", None, None, Some("Berlin")),
            create_profile("a", None, None, Some("Berlin")),
        ];

        let result = matcher.find_partners(Some(&viewer), candidates, &only_self("me"));
        assert_eq!(ids(&result), vec!["a"]);
    }
}
