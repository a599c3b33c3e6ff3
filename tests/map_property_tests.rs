use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use zonemap::logger::Log;
use zonemap::{
    Projection, Ring, TimeZoneDirectory, TimeZoneRecord, color_for_offset, get_regions,
};

/// Generate valid longitude values
fn longitude_strategy() -> impl Strategy<Value = f64> {
    -180.0..=180.0
}

/// Generate valid latitude values
fn latitude_strategy() -> impl Strategy<Value = f64> {
    -90.0..=90.0
}

/// Generate instants across several decades
fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    // 1990-01-01 .. 2040-01-01, whole seconds
    (631_152_000i64..2_208_988_800i64).prop_map(|secs| {
        DateTime::<Utc>::from_timestamp(secs, 0).expect("timestamp in range")
    })
}

fn triangle(lon: f64, lat: f64) -> Ring {
    vec![(lon, lat), (lon + 2.0, lat), (lon + 1.0, lat + 2.0), (lon, lat)]
}

fn mixed_directory() -> TimeZoneDirectory {
    Log::set_enabled(false);
    let dir = TimeZoneDirectory::load(
        [
            "UTC",
            "Etc/GMT-5",
            "Etc/GMT+3",
            "Europe/Berlin",
            "Asia/Kolkata",
            "Australia/Eucla",
            "",
            "Not/A_Zone",
        ]
        .iter()
        .enumerate()
        .map(|(i, id)| TimeZoneRecord {
            id: (*id).into(),
            polygons: vec![triangle(i as f64 * 10.0, 0.0)],
        })
        .collect(),
    );
    Log::set_enabled(true);
    dir
}

mod projection_properties {
    use super::*;

    proptest! {
        /// The rectangular projection is the identity and always visible.
        #[test]
        fn rectangular_identity(lon in longitude_strategy(), lat in latitude_strategy()) {
            let p = Projection::Rectangular.project(lon, lat);
            prop_assert_eq!((p.x, p.y, p.visible), (lon, lat, true));
        }

        /// The orthographic center column projects to x' = 0 and is visible.
        #[test]
        fn orthographic_center_column(lat in latitude_strategy(), center in longitude_strategy()) {
            let p = Projection::Orthographic { center }.project(center, lat);
            prop_assert!(p.x.abs() < 1e-9);
            prop_assert!(p.visible);
        }

        /// Wagner compresses longitudes and keeps latitude unchanged.
        #[test]
        fn wagner_compresses_x(lon in longitude_strategy(), lat in latitude_strategy()) {
            let p = Projection::Wagner.project(lon, lat);
            prop_assert!(p.x.abs() <= lon.abs() + 1e-9);
            prop_assert_eq!(p.y, lat);
            prop_assert!(p.visible);
        }

        /// Valid geographic input never produces non-finite planar output.
        #[test]
        fn projections_stay_finite(lon in longitude_strategy(), lat in latitude_strategy()) {
            for projection in [
                Projection::Rectangular,
                Projection::Wagner,
                Projection::ORTHO_AMERICAS,
                Projection::ORTHO_EUROPE_AFRICA,
                Projection::ORTHO_ASIA_AUSTRALIA,
            ] {
                let p = projection.project(lon, lat);
                prop_assert!(p.x.is_finite() && p.y.is_finite());
            }
        }
    }
}

mod region_properties {
    use super::*;

    proptest! {
        /// Regions partition the zone set: every zone appears in exactly one
        /// region, at any instant, with or without names.
        #[test]
        fn regions_partition_the_zones(utc in instant_strategy(), show_names in any::<bool>()) {
            let dir = mixed_directory();
            let regions = get_regions(utc, &dir, show_names);

            let mut seen: Vec<&str> = regions
                .iter()
                .flat_map(|r| r.members().iter().map(|tz| tz.id()))
                .collect();
            let total = seen.len();
            prop_assert_eq!(total, dir.len(), "every zone in exactly one region");
            seen.sort();
            seen.dedup();
            prop_assert_eq!(seen.len(), total, "member sets are pairwise disjoint");
        }

        /// Region order and keys are deterministic across repeated grouping.
        #[test]
        fn regions_are_deterministic(utc in instant_strategy(), show_names in any::<bool>()) {
            let dir = mixed_directory();
            let a = get_regions(utc, &dir, show_names);
            let b = get_regions(utc, &dir, show_names);
            let ka: Vec<_> = a.iter().map(|r| r.key().clone()).collect();
            let kb: Vec<_> = b.iter().map(|r| r.key().clone()).collect();
            prop_assert_eq!(ka, kb);
        }

        /// Whole-hour offsets whose difference is not a multiple of the
        /// palette length land on different palette colors.
        #[test]
        fn palette_separates_nearby_offsets(hours in -14i64..=14, delta in 1i64..=3) {
            let a = color_for_offset(Some(Duration::hours(hours)));
            let b = color_for_offset(Some(Duration::hours(hours + delta)));
            prop_assert_ne!(a, b);
        }
    }
}
