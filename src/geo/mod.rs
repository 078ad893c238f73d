use crate::models::location::GeoPoint;

const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Great-circle distance in kilometres between two WGS84 points.
///
/// Callers are expected to hand in coordinates that are already in range;
/// out-of-range input is not detected here.
pub fn haversine_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let sin_lat = (delta_lat / 2.0).sin();
    let sin_lng = (delta_lng / 2.0).sin();

    let h = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lng * sin_lng;
    let central_angle = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_KM * central_angle
}

#[cfg(test)]
mod tests {
    use super::haversine_km;
    use crate::models::location::GeoPoint;

    #[test]
    fn zero_distance_for_same_point() {
        let p = GeoPoint {
            lat: 40.7667,
            lng: 29.9167,
        };
        assert!(haversine_km(&p, &p) < 1e-9);
    }

    #[test]
    fn symmetric_in_its_arguments() {
        let a = GeoPoint {
            lat: 40.1885,
            lng: 29.0610,
        };
        let b = GeoPoint {
            lat: 41.0082,
            lng: 28.9784,
        };
        let ab = haversine_km(&a, &b);
        let ba = haversine_km(&b, &a);
        assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn istanbul_to_ankara_is_around_350_km() {
        let istanbul = GeoPoint {
            lat: 41.0082,
            lng: 28.9784,
        };
        let ankara = GeoPoint {
            lat: 39.9334,
            lng: 32.8597,
        };
        let distance = haversine_km(&istanbul, &ankara);
        assert!((distance - 351.0).abs() < 5.0);
    }
}
