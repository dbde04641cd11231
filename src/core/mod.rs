// Core algorithm exports
pub mod checkin;
pub mod distance;
pub mod exclusion;
pub mod matcher;

pub use checkin::{CheckInOutcome, CheckInPolicy, CheckInUpdate};
pub use distance::{haversine_distance, is_within_radius, DistanceUnit};
pub use exclusion::build_exclusion_set;
pub use matcher::{Matcher, MatchResult, DEFAULT_NEARBY_RADIUS_KM};
