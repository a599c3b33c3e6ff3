//! Grouping of time zones into regions sharing the same local time.
//!
//! A region is the set of zones that display identical local time (and,
//! when names are shown, the same zone name) at one instant. Regions are
//! ephemeral: rebuilt for every instant, never mutated. Their equality is
//! structural over `(name, offset, member set)`, independent of member
//! insertion order, and that equality is what the render cache compares.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use crate::constants::{REGION_PALETTE, UNKNOWN_REGION_COLOR};
use crate::timezone::{Ring, TimeZone, TimeZoneDirectory};
use crate::utils::Rgb;

/// Structural identity of a region: UTC offset, display name, and the sorted
/// member identifiers. Cheap to compare and hash; the render cache's regions
/// key is the list of these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionKey {
    pub offset_seconds: Option<i64>,
    pub name: Option<String>,
    pub members: Vec<String>,
}

/// A group of time zones sharing the same local time at one instant.
#[derive(Debug, Clone)]
pub struct Region<'a> {
    offset: Option<Duration>,
    name: Option<String>,
    members: Vec<&'a TimeZone>,
    color: Rgb,
    key: RegionKey,
}

impl<'a> Region<'a> {
    fn new(offset: Option<Duration>, name: Option<String>, members: Vec<&'a TimeZone>) -> Self {
        let mut ids: Vec<String> = members.iter().map(|tz| tz.id().to_string()).collect();
        ids.sort();
        let key = RegionKey {
            offset_seconds: offset.map(|o| o.num_seconds()),
            name: name.clone(),
            members: ids,
        };
        let color = color_for_offset(offset);
        Self { offset, name, members, color, key }
    }

    /// Local time minus UTC; `None` when the members' local time is unknown.
    pub fn offset(&self) -> Option<Duration> {
        self.offset
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn members(&self) -> &[&'a TimeZone] {
        &self.members
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn key(&self) -> &RegionKey {
        &self.key
    }

    /// All member polygons, concatenated in member order.
    pub fn polygons(&self) -> impl Iterator<Item = &'a Ring> + '_ {
        self.members.iter().flat_map(|tz| tz.polygons().iter())
    }
}

impl PartialEq for Region<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Region<'_> {}

impl Hash for Region<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

/// Partition the directory's zones into regions for the given instant.
///
/// Zones group by `(local time, name if requested)`; unresolved zones share
/// the `(None, None)` key and collapse into a single gray region. The result
/// is sorted ascending by `(offset, name)`, where a region with unknown
/// local time sorts as if its offset were zero, a deliberate tie-break with
/// the +00:00 regions.
pub fn get_regions<'a>(
    utc: DateTime<Utc>,
    zones: &'a TimeZoneDirectory,
    show_names: bool,
) -> Vec<Region<'a>> {
    // BTreeMap keeps grouping deterministic, so equal inputs always derive
    // identical region keys.
    let mut groups: BTreeMap<(Option<NaiveDateTime>, Option<String>), Vec<&'a TimeZone>> =
        BTreeMap::new();
    for tz in zones.iter() {
        let local = tz.local_time(utc);
        let name = if show_names { tz.name(utc) } else { None };
        groups.entry((local, name)).or_default().push(tz);
    }

    let mut regions: Vec<Region<'a>> = groups
        .into_iter()
        .map(|((local, name), members)| {
            let offset = local.map(|t| t - utc.naive_utc());
            Region::new(offset, name, members)
        })
        .collect();
    regions.sort_by(|a, b| {
        let ka = (a.offset.unwrap_or_else(Duration::zero), a.name.as_deref().unwrap_or(""));
        let kb = (b.offset.unwrap_or_else(Duration::zero), b.name.as_deref().unwrap_or(""));
        ka.cmp(&kb)
    });
    regions
}

/// Fill color for a region offset.
///
/// Whole-hour offsets index the cyclic palette directly; fractional offsets
/// (30/45-minute zones) blend linearly between the two adjacent entries.
/// An unknown offset maps to a fixed neutral gray outside the palette.
pub fn color_for_offset(offset: Option<Duration>) -> Rgb {
    let Some(offset) = offset else {
        return UNKNOWN_REGION_COLOR;
    };
    let hours = offset.num_seconds() as f64 / 3600.0;
    let base = hours.floor();
    let frac = (hours - base) as f32;
    let len = REGION_PALETTE.len() as i64;
    let a = REGION_PALETTE[(base as i64).rem_euclid(len) as usize];
    if frac == 0.0 {
        return a;
    }
    let b = REGION_PALETTE[(base as i64 + 1).rem_euclid(len) as usize];
    a.lerp(b, frac)
}
