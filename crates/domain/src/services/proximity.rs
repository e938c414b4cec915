//! Great-circle distance and the "stones near me" filter.
//!
//! The filter is a linear scan over the roster. Parsing the center and radius
//! from a request is the caller's job; these functions take plain `f64`s.

use crate::models::RosterEntry;

/// Mean Earth radius used by the Haversine formula, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between two points given in degrees.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Keeps the roster entries whose latest location lies within `radius_km` of
/// the center (boundary inclusive).
///
/// Entries without coordinates are always dropped. Relative order is kept.
pub fn filter_by_radius(
    roster: Vec<RosterEntry>,
    center_lat: f64,
    center_lng: f64,
    radius_km: f64,
) -> Vec<RosterEntry> {
    roster
        .into_iter()
        .filter(|entry| match entry.coordinates() {
            Some((lat, lng)) => haversine_km(center_lat, center_lng, lat, lng) <= radius_km,
            None => false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Stone;
    use chrono::Utc;
    use uuid::Uuid;

    fn entry(name: &str, coordinates: Option<(f64, f64)>) -> RosterEntry {
        RosterEntry {
            stone: Stone {
                id: Uuid::new_v4(),
                qr_token: format!("TOKEN-{}", name),
                code: "TOKE".into(),
                is_active: true,
                name: Some(name.to_string()),
                description: Some("test stone".into()),
                creator_user_id: Some(Uuid::new_v4()),
                created_at: Utc::now(),
            },
            latitude: coordinates.map(|c| c.0),
            longitude: coordinates.map(|c| c.1),
            photo_url: None,
            last_seen_at: coordinates.map(|_| Utc::now()),
        }
    }

    fn names(entries: &[RosterEntry]) -> Vec<&str> {
        entries
            .iter()
            .filter_map(|e| e.stone.name.as_deref())
            .collect()
    }

    #[test]
    fn test_haversine_zero_distance() {
        assert_eq!(haversine_km(48.1486, 17.1077, 48.1486, 17.1077), 0.0);
    }

    #[test]
    fn test_haversine_small_offsets_on_equator() {
        let near = haversine_km(0.0, 0.0, 0.0, 0.005);
        assert!((near - 0.556).abs() < 0.001, "got {}", near);

        let far = haversine_km(0.0, 0.0, 0.0, 0.02);
        assert!((far - 2.224).abs() < 0.001, "got {}", far);
    }

    #[test]
    fn test_haversine_known_city_pair() {
        // Bratislava to Vienna is roughly 55 km.
        let d = haversine_km(48.1486, 17.1077, 48.2082, 16.3738);
        assert!((d - 55.0).abs() < 2.0, "got {}", d);
    }

    #[test]
    fn test_haversine_is_symmetric() {
        let ab = haversine_km(10.0, 20.0, -5.0, 33.0);
        let ba = haversine_km(-5.0, 33.0, 10.0, 20.0);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_quarter_meridian() {
        let d = haversine_km(0.0, 0.0, 90.0, 0.0);
        let expected = EARTH_RADIUS_KM * std::f64::consts::FRAC_PI_2;
        assert!((d - expected).abs() < 1e-6);
    }

    #[test]
    fn test_filter_includes_near_and_excludes_far() {
        let roster = vec![
            entry("near", Some((0.0, 0.005))),
            entry("far", Some((0.0, 0.02))),
        ];

        let result = filter_by_radius(roster, 0.0, 0.0, 1.0);
        assert_eq!(names(&result), vec!["near"]);
    }

    #[test]
    fn test_filter_drops_unlocated_entries() {
        let roster = vec![entry("never-seen", None), entry("origin", Some((0.0, 0.0)))];

        let result = filter_by_radius(roster, 0.0, 0.0, 20_000.0);
        assert_eq!(names(&result), vec!["origin"]);
    }

    #[test]
    fn test_filter_keeps_zero_coordinates() {
        let result = filter_by_radius(vec![entry("null-island", Some((0.0, 0.0)))], 0.0, 0.1, 50.0);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_filter_zero_radius_exact_match_only() {
        let roster = vec![
            entry("exact", Some((50.0, 14.0))),
            entry("close", Some((50.0, 14.000001))),
        ];

        let result = filter_by_radius(roster, 50.0, 14.0, 0.0);
        assert_eq!(names(&result), vec!["exact"]);
    }

    #[test]
    fn test_filter_boundary_is_inclusive() {
        let d = haversine_km(0.0, 0.0, 0.0, 0.005);
        let result = filter_by_radius(vec![entry("edge", Some((0.0, 0.005)))], 0.0, 0.0, d);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_filter_is_pure_and_keeps_order() {
        let roster = vec![
            entry("a", Some((0.0, 0.001))),
            entry("b", Some((5.0, 5.0))),
            entry("c", Some((0.0, -0.001))),
        ];

        let first = filter_by_radius(roster.clone(), 0.0, 0.0, 1.0);
        let second = filter_by_radius(roster, 0.0, 0.0, 1.0);
        assert_eq!(first, second);
        assert_eq!(names(&first), vec!["a", "c"]);
    }

    #[test]
    fn test_filter_empty_roster() {
        assert!(filter_by_radius(vec![], 0.0, 0.0, 10.0).is_empty());
    }
}
