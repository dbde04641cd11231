// Unit tests for Spotter

use spotter::core::{
    checkin::{CheckInOutcome, CheckInPolicy},
    distance::{haversine_distance, is_within_radius, DistanceUnit},
};
use spotter::models::{GeoPoint, UserProfile};
use chrono::{TimeZone, Utc};
use std::collections::BTreeMap;

#[test]
fn test_haversine_distance_zero() {
    let origin = GeoPoint::new(0.0, 0.0);
    assert_eq!(haversine_distance(origin, origin, DistanceUnit::Kilometers), 0.0);
    assert!(is_within_radius(0.0, 5.0));
}

#[test]
fn test_haversine_distance_manhattan_to_brooklyn() {
    // Manhattan to Brooklyn is approximately 5-10 km
    let manhattan = GeoPoint::new(40.7580, -73.9855);
    let brooklyn = GeoPoint::new(40.6782, -73.9442);

    let distance = haversine_distance(manhattan, brooklyn, DistanceUnit::Kilometers);
    assert!(distance > 5.0 && distance < 15.0);
}

#[test]
fn test_haversine_new_york_to_los_angeles() {
    let nyc = GeoPoint::new(40.7128, -74.0060);
    let la = GeoPoint::new(34.0522, -118.2437);

    let distance = haversine_distance(nyc, la, DistanceUnit::Kilometers);
    assert!((distance - 3944.0).abs() < 100.0, "Expected ~3944km, got {}", distance);
}

#[test]
fn test_meter_scale_distance() {
    // 0.001 deg latitude ~ 111m
    let distance = haversine_distance(
        GeoPoint::new(52.5200, 13.4050),
        GeoPoint::new(52.5210, 13.4050),
        DistanceUnit::Meters,
    );
    assert!((distance - 111.2).abs() < 1.0, "Expected ~111m, got {}", distance);
}

#[test]
fn test_radius_boundary() {
    assert!(is_within_radius(5.0, 5.0));
    assert!(!is_within_radius(5.001, 5.0));
}

#[test]
fn test_check_in_twice_same_day() {
    let policy = CheckInPolicy::default();
    let mut profile = UserProfile {
        user_id: "u1".to_string(),
        name: "Sam".to_string(),
        gym_address: Some("Iron Temple".to_string()),
        gym_latitude: Some(52.5200),
        gym_longitude: Some(13.4050),
        city: None,
        dietary_preference: None,
        attendance: BTreeMap::new(),
        streak: Some(2),
        last_check_in: None,
    };
    let at_gym = GeoPoint::new(52.5200, 13.4051);
    let now = Utc.with_ymd_and_hms(2026, 10, 17, 7, 15, 0).unwrap();

    let first = policy.evaluate(&profile, at_gym, now);
    let CheckInOutcome::CheckedIn { update, .. } = first else {
        panic!("expected first check-in to succeed, got {:?}", first);
    };
    assert_eq!(update.streak, 3);

    // Apply what the route writes back
    profile.attendance.insert(update.attendance_key(), true);
    profile.streak = Some(update.streak);
    profile.last_check_in = Some(update.date);

    let later = Utc.with_ymd_and_hms(2026, 10, 17, 19, 0, 0).unwrap();
    assert_eq!(policy.evaluate(&profile, at_gym, later), CheckInOutcome::AlreadyCheckedIn);

    let tomorrow = Utc.with_ymd_and_hms(2026, 10, 18, 7, 0, 0).unwrap();
    assert!(matches!(
        policy.evaluate(&profile, at_gym, tomorrow),
        CheckInOutcome::CheckedIn { update, .. } if update.streak == 4
    ));
}
