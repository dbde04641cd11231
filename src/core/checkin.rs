use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Timelike, Utc};
use crate::models::{GeoPoint, UserProfile};
use crate::core::distance::{haversine_distance, is_within_radius, DistanceUnit};

/// Rules for the automatic gym check-in
#[derive(Debug, Clone, Copy)]
pub struct CheckInPolicy {
    pub radius_meters: f64,
    /// First local hour (inclusive) a check-in is accepted
    pub open_hour: u32,
    /// Local hour (exclusive) after which check-ins are refused
    pub close_hour: u32,
    pub utc_offset: FixedOffset,
}

impl Default for CheckInPolicy {
    fn default() -> Self {
        Self {
            radius_meters: 100.0,
            open_hour: 5,
            close_hour: 23,
            utc_offset: Utc.fix(),
        }
    }
}

/// Fields written back to the profile on a successful check-in
#[derive(Debug, Clone, PartialEq)]
pub struct CheckInUpdate {
    pub date: NaiveDate,
    pub streak: u32,
}

impl CheckInUpdate {
    /// Attendance key for `date`
    pub fn attendance_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckInOutcome {
    CheckedIn { update: CheckInUpdate, distance_meters: f64 },
    AlreadyCheckedIn,
    OutsideWindow,
    TooFar { distance_meters: f64 },
    NoGymLocation,
}

impl CheckInOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            CheckInOutcome::CheckedIn { .. } => "checked_in",
            CheckInOutcome::AlreadyCheckedIn => "already_checked_in",
            CheckInOutcome::OutsideWindow => "outside_window",
            CheckInOutcome::TooFar { .. } => "too_far",
            CheckInOutcome::NoGymLocation => "no_gym_location",
        }
    }
}

impl CheckInPolicy {
    /// Local calendar date of `now`
    pub fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.utc_offset).date_naive()
    }

    fn within_window(&self, now: DateTime<Utc>) -> bool {
        let hour = now.with_timezone(&self.utc_offset).hour();
        hour >= self.open_hour && hour < self.close_hour
    }

    /// Decide whether `position` counts as a check-in at the profile's gym
    pub fn evaluate(&self, profile: &UserProfile, position: GeoPoint, now: DateTime<Utc>) -> CheckInOutcome {
        let Some(gym) = profile.gym_location() else {
            return CheckInOutcome::NoGymLocation;
        };

        let today = self.local_date(now);
        let today_key = today.format("%Y-%m-%d").to_string();
        if profile.last_check_in == Some(today)
            || profile.attendance.get(&today_key).copied().unwrap_or(false)
        {
            return CheckInOutcome::AlreadyCheckedIn;
        }

        if !self.within_window(now) {
            return CheckInOutcome::OutsideWindow;
        }

        let distance_meters = haversine_distance(gym, position, DistanceUnit::Meters);
        if !is_within_radius(distance_meters, self.radius_meters) {
            return CheckInOutcome::TooFar { distance_meters };
        }

        CheckInOutcome::CheckedIn {
            update: CheckInUpdate {
                date: today,
                streak: profile.streak.unwrap_or(0).saturating_add(1),
            },
            distance_meters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn gym_goer() -> UserProfile {
        UserProfile {
            user_id: "u1".to_string(),
            name: "Gym Goer".to_string(),
            gym_address: Some("Iron Temple".to_string()),
            gym_latitude: Some(52.5200),
            gym_longitude: Some(13.4050),
            city: Some("Berlin".to_string()),
            dietary_preference: None,
            attendance: BTreeMap::new(),
            streak: Some(4),
            last_check_in: None,
        }
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, hour, 30, 0).unwrap()
    }

    #[test]
    fn test_check_in_at_gym() {
        let policy = CheckInPolicy::default();
        let outcome = policy.evaluate(&gym_goer(), GeoPoint::new(52.5201, 13.4050), at(18));

        match outcome {
            CheckInOutcome::CheckedIn { update, distance_meters } => {
                assert_eq!(update.streak, 5);
                assert_eq!(update.attendance_key(), "2026-10-17");
                assert!(distance_meters < 20.0);
            }
            other => panic!("expected check-in, got {:?}", other),
        }
    }

    #[test]
    fn test_too_far() {
        let policy = CheckInPolicy::default();
        // ~1.1km north
        let outcome = policy.evaluate(&gym_goer(), GeoPoint::new(52.5300, 13.4050), at(18));
        assert!(matches!(outcome, CheckInOutcome::TooFar { distance_meters } if distance_meters > 1000.0));
    }

    #[test]
    fn test_outside_window() {
        let policy = CheckInPolicy::default();
        let outcome = policy.evaluate(&gym_goer(), GeoPoint::new(52.5200, 13.4050), at(3));
        assert_eq!(outcome, CheckInOutcome::OutsideWindow);
    }

    #[test]
    fn test_already_checked_in_today() {
        let policy = CheckInPolicy::default();
        let mut profile = gym_goer();
        profile.last_check_in = NaiveDate::from_ymd_opt(2026, 10, 17);

        let outcome = policy.evaluate(&profile, GeoPoint::new(52.5200, 13.4050), at(18));
        assert_eq!(outcome, CheckInOutcome::AlreadyCheckedIn);
    }

    #[test]
    fn test_attendance_mark_counts_as_checked_in() {
        let policy = CheckInPolicy::default();
        let mut profile = gym_goer();
        profile.attendance.insert("2026-10-17".to_string(), true);

        let outcome = policy.evaluate(&profile, GeoPoint::new(52.5200, 13.4050), at(18));
        assert_eq!(outcome, CheckInOutcome::AlreadyCheckedIn);
    }

    #[test]
    fn test_no_gym_location() {
        let policy = CheckInPolicy::default();
        let mut profile = gym_goer();
        profile.gym_longitude = None;

        let outcome = policy.evaluate(&profile, GeoPoint::new(52.5200, 13.4050), at(18));
        assert_eq!(outcome, CheckInOutcome::NoGymLocation);
    }

    #[test]
    fn test_offset_shifts_local_day() {
        let policy = CheckInPolicy {
            utc_offset: FixedOffset::east_opt(2 * 3600).unwrap(),
            ..CheckInPolicy::default()
        };
        // 23:30 UTC is already the next day at UTC+2
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 23, 30, 0).unwrap();
        assert_eq!(policy.local_date(now), NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
    }

    #[test]
    fn test_missing_streak_starts_at_one() {
        let policy = CheckInPolicy::default();
        let mut profile = gym_goer();
        profile.streak = None;

        let outcome = policy.evaluate(&profile, GeoPoint::new(52.5200, 13.4050), at(8));
        assert!(matches!(outcome, CheckInOutcome::CheckedIn { update, .. } if update.streak == 1));
    }
}
