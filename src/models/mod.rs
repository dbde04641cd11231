// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{GeoPoint, UserProfile, Swipe, SwipeAction, Match, Tier};
pub use requests::{SwipeRequest, CheckInRequest};
pub use responses::{PartnersResponse, HealthResponse, ErrorResponse, SwipeResponse, CheckInResponse};
