use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// User profile document as stored in the `user_profiles` collection.
///
/// The document id doubles as the user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "$id")]
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "gymAddress", default)]
    pub gym_address: Option<String>,
    #[serde(rename = "gymLatitude", default)]
    pub gym_latitude: Option<f64>,
    #[serde(rename = "gymLongitude", default)]
    pub gym_longitude: Option<f64>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(rename = "dietaryPreference", default)]
    pub dietary_preference: Option<String>,
    /// Keyed by `YYYY-MM-DD`
    #[serde(default)]
    pub attendance: BTreeMap<String, bool>,
    #[serde(default)]
    pub streak: Option<u32>,
    #[serde(rename = "lastCheckIn", default)]
    pub last_check_in: Option<NaiveDate>,
}

impl UserProfile {
    /// Gym coordinates, only when both halves are present
    pub fn gym_location(&self) -> Option<GeoPoint> {
        match (self.gym_latitude, self.gym_longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        }
    }

    /// Gym address if set and not blank
    pub fn gym(&self) -> Option<&str> {
        non_empty(self.gym_address.as_deref())
    }

    /// City if set and not blank
    pub fn home_city(&self) -> Option<&str> {
        non_empty(self.city.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Direction of a swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeAction {
    Like,
    Pass,
}

/// A like/pass from `swiper_id` toward `target_id`. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swipe {
    #[serde(rename = "swiperId")]
    pub swiper_id: String,
    #[serde(rename = "targetId")]
    pub target_id: String,
    pub action: SwipeAction,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Mutual like between two users. Order inside `users` carries no meaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub users: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Match {
    pub fn between(a: &str, b: &str) -> Self {
        Self {
            users: vec![a.to_string(), b.to_string()],
            created_at: Utc::now(),
        }
    }

    /// Every member of the pair other than `user_id`
    pub fn others<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.users
            .iter()
            .map(String::as_str)
            .filter(move |id| *id != user_id)
    }
}

/// Priority bucket a candidate falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    SameGym,
    Nearby,
    SameCity,
}
