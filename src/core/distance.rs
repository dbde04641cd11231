use crate::models::GeoPoint;

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Unit a distance is reported in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceUnit {
    Kilometers,
    Meters,
}

impl DistanceUnit {
    /// Earth's radius expressed in this unit
    #[inline]
    pub fn earth_radius(self) -> f64 {
        match self {
            DistanceUnit::Kilometers => EARTH_RADIUS_KM,
            DistanceUnit::Meters => EARTH_RADIUS_KM * 1000.0,
        }
    }
}

/// Calculate the Haversine distance between two points
///
/// # Arguments
/// * `from` - First point, degrees
/// * `to` - Second point, degrees
/// * `unit` - Unit of the returned distance
///
/// # Returns
/// Great-circle distance in `unit`
#[inline]
pub fn haversine_distance(from: GeoPoint, to: GeoPoint, unit: DistanceUnit) -> f64 {
    let lat1_rad = from.latitude.to_radians();
    let lat2_rad = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    unit.earth_radius() * c
}

/// Inclusive radius check
#[inline]
pub fn is_within_radius(distance: f64, radius: f64) -> bool {
    distance <= radius
}
