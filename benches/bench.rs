// Criterion benchmarks for Spotter

use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use spotter::core::{build_exclusion_set, Matcher, distance::{haversine_distance, DistanceUnit}};
use spotter::models::{GeoPoint, Match, UserProfile};
use std::collections::BTreeMap;

const GYMS: &[&str] = &["Iron Temple", "Muscle Barn", "Gold's", "Crossfit Mitte", "Urban Gym"];
const CITIES: &[&str] = &["Berlin", "Munich", "Hamburg", "Cologne"];

fn create_candidate(id: usize) -> UserProfile {
    let lat = 52.40 + (id % 100) as f64 * 0.003;
    let lon = 13.30 + (id % 37) as f64 * 0.005;

    UserProfile {
        user_id: id.to_string(),
        name: format!("User {}", id),
        gym_address: (id % 3 != 0).then(|| GYMS[id % GYMS.len()].to_string()),
        gym_latitude: (id % 4 != 0).then_some(lat),
        gym_longitude: (id % 4 != 0).then_some(lon),
        city: Some(CITIES[id % CITIES.len()].to_string()),
        dietary_preference: None,
        attendance: BTreeMap::new(),
        streak: None,
        last_check_in: None,
    }
}

fn create_viewer() -> UserProfile {
    UserProfile {
        user_id: "viewer".to_string(),
        name: "Viewer".to_string(),
        gym_address: Some("Iron Temple".to_string()),
        gym_latitude: Some(52.5200),
        gym_longitude: Some(13.4050),
        city: Some("Berlin".to_string()),
        dietary_preference: None,
        attendance: BTreeMap::new(),
        streak: None,
        last_check_in: None,
    }
}

fn bench_haversine_distance(c: &mut Criterion) {
    c.bench_function("haversine_distance", |b| {
        b.iter(|| {
            haversine_distance(
                black_box(GeoPoint::new(40.7128, -74.0060)),
                black_box(GeoPoint::new(40.72, -74.01)),
                DistanceUnit::Kilometers,
            )
        });
    });
}

fn bench_find_partners(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_partners");
    let matcher = Matcher::default();
    let viewer = create_viewer();

    for size in [1_000usize, 10_000, 50_000] {
        let candidates: Vec<UserProfile> = (0..size).map(create_candidate).collect();
        let matches: Vec<Match> = (0..size / 50).map(|i| Match::between("viewer", &(i * 7).to_string())).collect();
        let excluded = build_exclusion_set("viewer", &matches, &[]);

        group.bench_with_input(BenchmarkId::from_parameter(size), &candidates, |b, candidates| {
            b.iter(|| matcher.find_partners(Some(black_box(&viewer)), candidates.clone(), &excluded));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_haversine_distance, bench_find_partners);
criterion_main!(benches);
