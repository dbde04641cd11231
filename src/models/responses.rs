use serde::{Deserialize, Serialize};
use crate::models::domain::UserProfile;

/// Response for the partners endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnersResponse {
    pub profiles: Vec<UserProfile>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(status_code: u16, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status_code,
        }
    }
}

/// Swipe response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwipeResponse {
    #[serde(rename = "swipeId")]
    pub swipe_id: String,
    pub matched: bool,
}

/// Check-in response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInResponse {
    pub status: String,
    pub streak: u32,
    #[serde(rename = "distanceMeters")]
    pub distance_meters: Option<f64>,
}
