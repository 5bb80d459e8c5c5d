use crate::model::geo::GeoPoint;

/// Radius around the teacher inside which a check-in is accepted.
pub const PROXIMITY_THRESHOLD_METERS: f64 = 100.0;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityCheck {
    pub distance_meters: f64,
    pub within_range: bool,
}

/// Haversine great-circle distance.
pub fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Exactly the threshold still passes.
pub fn check(reference: GeoPoint, submitted: GeoPoint) -> ProximityCheck {
    let distance_meters = distance_meters(reference, submitted);
    ProximityCheck {
        distance_meters,
        within_range: distance_meters <= PROXIMITY_THRESHOLD_METERS,
    }
}

/// Distance shown to a student, to 0.1 m. Anything past the threshold
/// reads as past it.
pub fn reported_meters(distance_meters: f64) -> f64 {
    let rounded = (distance_meters * 10.0).round() / 10.0;
    if distance_meters > PROXIMITY_THRESHOLD_METERS && rounded <= PROXIMITY_THRESHOLD_METERS {
        PROXIMITY_THRESHOLD_METERS + 0.1
    } else {
        rounded
    }
}
