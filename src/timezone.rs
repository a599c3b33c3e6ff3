//! Time-zone records and the directory that owns them.
//!
//! The directory is built once from the external polygon dataset and is
//! read-only afterwards. Each record's identifier is resolved against the
//! bundled tz database at load time; identifiers the database does not know
//! (including the dataset's empty identifier for zoneless land) keep their
//! polygons but have no local-time rule, and are warned about exactly once
//! here rather than on every query.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Offset, Utc};
use chrono_tz::{OffsetName, Tz};

/// A closed polygon ring of `(longitude, latitude)` pairs in degrees.
pub type Ring = Vec<(f64, f64)>;

/// One row of the input dataset, as produced by the external loader.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeZoneRecord {
    pub id: String,
    pub polygons: Vec<Ring>,
}

/// A loaded time zone: identifier, boundary polygons, and the local-time
/// rule, absent when the identifier was unresolvable.
#[derive(Debug, Clone)]
pub struct TimeZone {
    id: String,
    polygons: Vec<Ring>,
    rule: Option<Tz>,
}

impl TimeZone {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn polygons(&self) -> &[Ring] {
        &self.polygons
    }

    /// Whether the identifier resolved to a local-time rule.
    pub fn is_resolved(&self) -> bool {
        self.rule.is_some()
    }

    /// Wall-clock date and time in this zone at the given UTC instant, or
    /// `None` for an unresolved zone.
    pub fn local_time(&self, utc: DateTime<Utc>) -> Option<NaiveDateTime> {
        self.rule.map(|tz| utc.with_timezone(&tz).naive_local())
    }

    /// Display name of the zone at the given instant: the abbreviation in
    /// effect (CET, PDT, ...), falling back to the numeric UTC offset for
    /// zones whose tzdata name is not alphabetic.
    pub fn name(&self, utc: DateTime<Utc>) -> Option<String> {
        let tz = self.rule?;
        let local = utc.with_timezone(&tz);
        let offset = local.offset();
        match offset.abbreviation() {
            Some(abbr) => Some(abbr.to_string()),
            None => Some(offset.fix().to_string()),
        }
    }
}

/// Owns all loaded [`TimeZone`]s. Lookup by identifier is O(1); iteration
/// follows load order, which callers must treat as an internal detail.
#[derive(Debug, Clone, Default)]
pub struct TimeZoneDirectory {
    zones: Vec<TimeZone>,
    index: HashMap<String, usize>,
}

impl TimeZoneDirectory {
    /// Build the directory from dataset records.
    ///
    /// Degenerate rings (fewer than three distinct points after closure, or
    /// containing non-finite coordinates) are dropped here; they contribute
    /// nothing to any region.
    pub fn load(records: Vec<TimeZoneRecord>) -> Self {
        log_block_start!("Loading {} time zone records", records.len());
        let mut zones = Vec::with_capacity(records.len());
        let mut index = HashMap::with_capacity(records.len());
        let mut unresolved = 0usize;

        for record in records {
            let rule = match Tz::from_str(&record.id) {
                Ok(tz) => Some(tz),
                Err(_) => {
                    unresolved += 1;
                    log_warning!("Unknown time zone: {:?}", record.id);
                    None
                }
            };
            let polygons: Vec<Ring> = record
                .polygons
                .into_iter()
                .filter(|ring| keep_ring(&record.id, ring))
                .collect();
            index.insert(record.id.clone(), zones.len());
            zones.push(TimeZone { id: record.id, polygons, rule });
        }

        log_indented!("{} zones loaded, {} without a local time rule", zones.len(), unresolved);
        Self { zones, index }
    }

    pub fn get(&self, id: &str) -> Option<&TimeZone> {
        self.index.get(id).map(|&i| &self.zones[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimeZone> {
        self.zones.iter()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

fn keep_ring(id: &str, ring: &Ring) -> bool {
    if ring.iter().any(|&(x, y)| !x.is_finite() || !y.is_finite()) {
        log_debug!("Dropping ring with non-finite coordinates in {id:?}");
        return false;
    }
    let closed = ring.len() >= 2 && ring.first() == ring.last();
    let distinct = if closed { ring.len() - 1 } else { ring.len() };
    if distinct < 3 {
        log_debug!("Dropping degenerate ring ({} points) in {id:?}", ring.len());
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::Log;
    use chrono::TimeZone as _;

    fn square(lon: f64, lat: f64, size: f64) -> Ring {
        vec![
            (lon, lat),
            (lon + size, lat),
            (lon + size, lat + size),
            (lon, lat + size),
            (lon, lat),
        ]
    }

    #[test]
    fn resolves_known_ids_and_keeps_unknown() {
        Log::set_enabled(false);
        let dir = TimeZoneDirectory::load(vec![
            TimeZoneRecord {
                id: "Europe/Berlin".into(),
                polygons: vec![square(10.0, 50.0, 5.0)],
            },
            TimeZoneRecord {
                id: "Not/A_Zone".into(),
                polygons: vec![square(0.0, 0.0, 5.0)],
            },
            TimeZoneRecord { id: "".into(), polygons: vec![square(30.0, 30.0, 5.0)] },
        ]);
        Log::set_enabled(true);

        assert_eq!(dir.len(), 3);
        assert!(dir.get("Europe/Berlin").is_some_and(TimeZone::is_resolved));
        assert!(dir.get("Not/A_Zone").is_some_and(|tz| !tz.is_resolved()));
        assert!(dir.get("").is_some_and(|tz| !tz.is_resolved()));
        // unresolved zones keep their geometry
        assert_eq!(dir.get("Not/A_Zone").map(|tz| tz.polygons().len()), Some(1));
    }

    #[test]
    fn local_time_and_name_follow_the_rules() {
        Log::set_enabled(false);
        let dir = TimeZoneDirectory::load(vec![
            TimeZoneRecord {
                id: "Europe/Berlin".into(),
                polygons: vec![square(10.0, 50.0, 5.0)],
            },
            TimeZoneRecord { id: "bogus".into(), polygons: vec![] },
        ]);
        Log::set_enabled(true);

        // January: CET, UTC+1
        let utc = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let berlin = dir.get("Europe/Berlin").unwrap();
        let local = berlin.local_time(utc).unwrap();
        assert_eq!(local.format("%H:%M").to_string(), "13:00");
        assert_eq!(berlin.name(utc).as_deref(), Some("CET"));

        // July: CEST, UTC+2
        let utc = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();
        let local = berlin.local_time(utc).unwrap();
        assert_eq!(local.format("%H:%M").to_string(), "14:00");
        assert_eq!(berlin.name(utc).as_deref(), Some("CEST"));

        let bogus = dir.get("bogus").unwrap();
        assert_eq!(bogus.local_time(utc), None);
        assert_eq!(bogus.name(utc), None);
    }

    #[test]
    fn degenerate_rings_are_dropped_at_load() {
        Log::set_enabled(false);
        let dir = TimeZoneDirectory::load(vec![TimeZoneRecord {
            id: "UTC".into(),
            polygons: vec![
                vec![],
                vec![(0.0, 0.0), (1.0, 1.0)],
                // closed ring with only two distinct points
                vec![(0.0, 0.0), (1.0, 1.0), (0.0, 0.0)],
                vec![(0.0, f64::NAN), (1.0, 1.0), (2.0, 0.0)],
                square(0.0, 0.0, 2.0),
            ],
        }]);
        Log::set_enabled(true);

        assert_eq!(dir.get("UTC").map(|tz| tz.polygons().len()), Some(1));
    }
}
