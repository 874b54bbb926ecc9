//! Linear-scan nearest-airport resolution.
//!
//! The dataset is bounded by the world's commercial airport count (a few
//! thousand records), so an O(n) scan with one haversine evaluation per
//! record is a deliberate choice over a spatial index.

use crate::error::{Error, Result};
use crate::geo::haversine_km;
use crate::store::{AirportDataset, AirportRecord};

/// A resolved nearest airport together with its great-circle distance from
/// the query point, in kilometers at full precision.
#[derive(Debug, Clone, PartialEq)]
pub struct Nearest<'a> {
    pub airport: &'a AirportRecord,
    pub distance_km: f64,
}

/// Find the airport closest to the query coordinate.
///
/// Exact distance ties resolve to the record that appears first in the
/// dataset's stored order, reproducibly across calls (strict `<`
/// comparison). Fails with `Error::EmptyDataset` on a zero-record dataset.
///
/// Coordinate range validation is the caller's responsibility; this
/// function is a pure scan over validated input.
pub fn resolve_nearest(
    dataset: &AirportDataset,
    latitude: f64,
    longitude: f64,
) -> Result<Nearest<'_>> {
    let mut best: Option<Nearest<'_>> = None;

    for airport in dataset.iter() {
        let distance_km = haversine_km(latitude, longitude, airport.latitude, airport.longitude);
        let closer = match &best {
            Some(current) => distance_km < current.distance_km,
            None => true,
        };
        if closer {
            best = Some(Nearest {
                airport,
                distance_km,
            });
        }
    }

    best.ok_or(Error::EmptyDataset)
}

/// Round a distance to two decimal places for external reporting.
///
/// Internal computation keeps full precision; only the externally-reported
/// value is rounded.
pub fn round_km(distance_km: f64) -> f64 {
    (distance_km * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(code: &str, latitude: f64, longitude: f64) -> AirportRecord {
        AirportRecord {
            code: code.to_string(),
            city_code: code.to_string(),
            country_name: "Testland".to_string(),
            latitude,
            longitude,
        }
    }

    fn paris_dataset() -> AirportDataset {
        AirportDataset::new(vec![
            record("CDG", 49.0097, 2.5479),
            record("ORY", 48.7233, 2.3794),
        ])
    }

    #[test]
    fn resolves_orly_for_central_paris() {
        let dataset = paris_dataset();
        let nearest = resolve_nearest(&dataset, 48.8566, 2.3522).unwrap();

        assert_eq!(nearest.airport.code, "ORY");
        // ORY is ~14.96 km from central Paris; CDG is ~22.2 km.
        assert!((nearest.distance_km - 14.96).abs() < 0.05);
    }

    #[test]
    fn empty_dataset_is_an_error() {
        let dataset = AirportDataset::default();
        match resolve_nearest(&dataset, 0.0, 0.0) {
            Err(Error::EmptyDataset) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn single_record_wins_regardless_of_query_point() {
        let dataset = AirportDataset::new(vec![record("LHR", 51.4700, -0.4543)]);

        for &(lat, lon) in &[(0.0, 0.0), (89.9, 179.9), (-45.0, -120.0), (51.47, -0.4543)] {
            let nearest = resolve_nearest(&dataset, lat, lon).unwrap();
            assert_eq!(nearest.airport.code, "LHR");
            assert!(nearest.distance_km >= 0.0);
        }
    }

    #[test]
    fn exact_ties_resolve_to_first_in_stored_order() {
        // Two records at the same coordinates are exactly equidistant from
        // any query point; the first one stored must win every time.
        let dataset = AirportDataset::new(vec![
            record("AAA", 10.0, 10.0),
            record("BBB", 10.0, 10.0),
        ]);

        for _ in 0..10 {
            let nearest = resolve_nearest(&dataset, 12.0, 12.0).unwrap();
            assert_eq!(nearest.airport.code, "AAA");
        }
    }

    #[test]
    fn resolved_record_is_present_in_dataset() {
        let dataset = paris_dataset();
        let nearest = resolve_nearest(&dataset, -33.9, 151.2).unwrap();

        assert!(dataset.iter().any(|a| a == nearest.airport));
        assert!(nearest.distance_km >= 0.0);
    }

    #[test]
    fn zero_distance_for_query_on_an_airport() {
        let dataset = paris_dataset();
        let nearest = resolve_nearest(&dataset, 48.7233, 2.3794).unwrap();
        assert_eq!(nearest.airport.code, "ORY");
        assert_eq!(nearest.distance_km, 0.0);
    }

    #[test]
    fn round_km_keeps_two_decimals() {
        assert_eq!(round_km(14.955619), 14.96);
        assert_eq!(round_km(12.0), 12.0);
        assert_eq!(round_km(0.004), 0.0);
        assert_eq!(round_km(0.005), 0.01);
    }
}
