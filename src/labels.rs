//! Label placement over a coarse raster.
//!
//! Region polygons are stamped onto a sub-degree grid by their bounding
//! extents, then 4-connected components of cells belonging to the same
//! region are flood-filled into label candidates. Stamping is deliberately
//! approximate: a later region's extents overwrite an earlier region's cells
//! where bounding boxes overlap (last write wins), with no polygon-interior
//! testing. Downstream visual placement depends on that behavior.

use std::collections::BTreeMap;

use chrono::Duration;

use crate::constants::LABEL_GRANULARITY;
use crate::region::Region;
use crate::utils::{Rgb, point_extents};

/// The drawing attributes a label keeps from its region, owned so cached
/// labels outlive the region list they were derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionPaint {
    pub offset: Duration,
    pub name: Option<String>,
    pub color: Rgb,
}

/// One connected component of a region's raster footprint: its area in
/// square degrees and the bounding-box center (not the true centroid) in
/// degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelCandidate {
    pub area: f64,
    pub lon: f64,
    pub lat: f64,
    pub paint: RegionPaint,
}

/// Rasterize the regions and emit one label candidate per connected
/// component. Regions with unknown local time get no labels.
pub fn place_labels(regions: &[Region<'_>]) -> Vec<LabelCandidate> {
    let g = LABEL_GRANULARITY;

    let mut cells: BTreeMap<(i32, i32), usize> = BTreeMap::new();
    for (idx, region) in regions.iter().enumerate() {
        if region.offset().is_none() {
            continue;
        }
        for ring in region.polygons() {
            let Some((min_x, min_y, max_x, max_y)) = point_extents(ring) else {
                continue;
            };
            let min_x = (g as f64 * min_x).round() as i32;
            let min_y = (g as f64 * min_y).round() as i32;
            let max_x = (g as f64 * max_x).round() as i32;
            let max_y = (g as f64 * max_y).round() as i32;
            for x in min_x..=max_x {
                for y in min_y..=max_y {
                    cells.insert((x, y), idx);
                }
            }
        }
    }

    // Flood fill same-region components with an explicit worklist; visited
    // cells leave the map, so the loop terminates when it is drained.
    const NEIGHBORS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
    let mut labels = Vec::new();
    while let Some((seed, idx)) = cells.pop_first() {
        let mut todo = vec![seed];
        let mut component = Vec::new();
        while let Some((x, y)) = todo.pop() {
            component.push((x, y));
            for (dx, dy) in NEIGHBORS {
                let neighbor = (x + dx, y + dy);
                if cells.get(&neighbor) == Some(&idx) {
                    cells.remove(&neighbor);
                    todo.push(neighbor);
                }
            }
        }

        let Some(offset) = regions[idx].offset() else {
            continue;
        };
        let (min_x, min_y, max_x, max_y) = cell_extents(&component);
        labels.push(LabelCandidate {
            area: component.len() as f64 / (g * g) as f64,
            lon: (min_x + max_x) as f64 / 2.0 / g as f64,
            lat: (min_y + max_y) as f64 / 2.0 / g as f64,
            paint: RegionPaint {
                offset,
                name: regions[idx].name().map(str::to_owned),
                color: regions[idx].color(),
            },
        });
    }
    labels
}

fn cell_extents(cells: &[(i32, i32)]) -> (i32, i32, i32, i32) {
    let mut extents = (i32::MAX, i32::MAX, i32::MIN, i32::MIN);
    for &(x, y) in cells {
        extents.0 = extents.0.min(x);
        extents.1 = extents.1.min(y);
        extents.2 = extents.2.max(x);
        extents.3 = extents.3.max(y);
    }
    extents
}
