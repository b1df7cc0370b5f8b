use crate::models::{NearbyProducer, Producer};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two `(lat, lon)` points,
/// haversine formula
pub fn haversine_km(origin: (f64, f64), target: (f64, f64)) -> f64 {
    let lat1 = origin.0.to_radians();
    let lon1 = origin.1.to_radians();
    let lat2 = target.0.to_radians();
    let lon2 = target.1.to_radians();

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Selects producers within `radius_km` of the origin, closest first.
///
/// Producers missing either coordinate are skipped, not rejected. The
/// radius is inclusive; a non-positive radius yields an empty result.
/// Equidistant producers keep their input order.
pub fn filter_by_distance(
    origin_lat: f64,
    origin_lon: f64,
    radius_km: f64,
    producers: &[Producer],
) -> Vec<NearbyProducer> {
    if radius_km <= 0.0 {
        return Vec::new();
    }

    let mut nearby: Vec<NearbyProducer> = producers
        .iter()
        .filter_map(|p| {
            let coords = p.coordinates()?;
            let distance_km = haversine_km((origin_lat, origin_lon), coords);
            (distance_km <= radius_km).then(|| NearbyProducer {
                producer: p.clone(),
                distance_km,
            })
        })
        .collect();

    // Vec::sort_by is stable, so ties stay in input order
    nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    nearby
}
