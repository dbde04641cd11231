//! Spotter - gym-partner matching service
//!
//! This library provides the partner discovery filter, swipe/match recording
//! and the automatic gym check-in used by the Spotter fitness app.

pub mod auth;
pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{Matcher, build_exclusion_set, distance::{haversine_distance, DistanceUnit}};
pub use self::models::{UserProfile, Swipe, Match, Tier, GeoPoint, PartnersResponse};
