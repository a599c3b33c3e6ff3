//! Render orchestration and the two-tier layer cache.
//!
//! [`WorldMap`] is the only entry point the drawing surface consumes. Each
//! redraw hands it the current control values as a [`RenderParams`] and gets
//! back a [`DrawPlan`]; the controller performs its own change detection
//! instead of reacting to setters:
//!
//! - the **label layer** is recomputed only when the set of regions (by
//!   structural equality) changes; a ticking minute keeps offsets and
//!   member sets stable, so labels survive it;
//! - the **base map layer** is recomputed only when the regions key, the
//!   projection, or the canvas size changes, and is shared as an `Arc`
//!   snapshot otherwise;
//! - the **terminator** is rebuilt on every request that shows day/night;
//!   it follows the instant and the projection and is never cached.
//!
//! Each cache slot stores its key and derived value as one `Option` pair, so
//! a key is never observable without its matching value. Under a single
//! thread no locking is needed; a multi-threaded host must wrap [`WorldMap`]
//! in a mutex, since label and map computation mutate local accumulators.
//!
//! All plan geometry is in projection space with y growing northward. The
//! external renderer owns device transforms: centering, scaling by
//! [`BaseLayer::fit_scale`], the y flip, fonts, and pixel output.

use std::sync::Arc;

use anyhow::{Result, bail};
use chrono::{DateTime, Duration, Utc};

use crate::constants::{EDGE_DATE_COLOR, LABEL_MIN_AREA_DEG2};
use crate::labels::{LabelCandidate, place_labels};
use crate::projection::{PlanarPoint, Projection};
use crate::region::{Region, RegionKey, get_regions};
use crate::terminator::{TerminatorShape, terminator};
use crate::timezone::TimeZoneDirectory;
use crate::utils::Rgb;

/// Current control values, supplied by the host UI on every redraw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParams {
    pub utc: DateTime<Utc>,
    pub projection: Projection,
    pub show_names: bool,
    pub show_day_night: bool,
    /// Canvas size in pixels.
    pub canvas: (u32, u32),
}

/// A filled region shape: every member polygon projected, sharing one fill.
/// Rings are stroked with [`crate::constants::BORDER_COLOR`] and filled.
#[derive(Debug, Clone, PartialEq)]
pub struct FilledShape {
    pub rings: Vec<Vec<PlanarPoint>>,
    pub fill: Rgb,
}

/// The cached base map layer: world outline and filled region polygons, plus
/// the canvas fit it was computed for.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseLayer {
    /// World edge ring, filled with [`crate::constants::OCEAN_COLOR`].
    pub outline: Vec<PlanarPoint>,
    /// Region shapes in draw order (ascending offset).
    pub regions: Vec<FilledShape>,
    pub canvas: (u32, u32),
    /// Uniform scale fitting the projected world into the canvas.
    pub fit_scale: f64,
}

/// Positioned text in projection space. Lines are stacked in one box by the
/// renderer, in the given color.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub x: f64,
    pub y: f64,
    pub lines: Vec<String>,
    pub color: Rgb,
}

/// One frame's draw sequence: base map first, then labels, then the shadow
/// polygon when day/night display is on.
#[derive(Debug, Clone)]
pub struct DrawPlan {
    pub base: Arc<BaseLayer>,
    pub labels: Vec<TextLabel>,
    pub shadow: Option<TerminatorShape>,
}

/// Rebuild counters, for diagnostics and cache verification.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderStats {
    pub label_rebuilds: u64,
    pub map_rebuilds: u64,
}

type RegionsKey = Vec<RegionKey>;
type MapKey = (RegionsKey, Projection, (u32, u32));

/// Owns the time-zone directory and the layer caches.
pub struct WorldMap {
    zones: TimeZoneDirectory,
    labels: Option<(RegionsKey, Vec<LabelCandidate>)>,
    map: Option<(MapKey, Arc<BaseLayer>)>,
    stats: RenderStats,
}

impl WorldMap {
    pub fn new(zones: TimeZoneDirectory) -> Self {
        Self { zones, labels: None, map: None, stats: RenderStats::default() }
    }

    pub fn zones(&self) -> &TimeZoneDirectory {
        &self.zones
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Produce the draw plan for the given control values.
    ///
    /// Errors only on invalid parameters; cache-key derivation and layer
    /// assembly cannot fail.
    pub fn render(&mut self, params: &RenderParams) -> Result<DrawPlan> {
        let (w, h) = params.canvas;
        if w == 0 || h == 0 {
            bail!("canvas must have non-zero dimensions, got {w}x{h}");
        }

        let regions = get_regions(params.utc, &self.zones, params.show_names);
        let regions_key: RegionsKey = regions.iter().map(|r| r.key().clone()).collect();

        let candidates = match self.labels.take() {
            Some((key, cached)) if key == regions_key => cached,
            _ => {
                self.stats.label_rebuilds += 1;
                place_labels(&regions)
            }
        };

        let map_key: MapKey = (regions_key.clone(), params.projection, params.canvas);
        let base = match self.map.take() {
            Some((key, layer)) if key == map_key => {
                let reuse = Arc::clone(&layer);
                self.map = Some((key, layer));
                reuse
            }
            _ => {
                self.stats.map_rebuilds += 1;
                let layer = Arc::new(build_base_layer(&regions, params.projection, params.canvas));
                self.map = Some((map_key, Arc::clone(&layer)));
                layer
            }
        };

        let labels = compose_labels(&candidates, params);
        self.labels = Some((regions_key, candidates));

        let shadow = params
            .show_day_night
            .then(|| terminator(params.utc, params.projection));

        Ok(DrawPlan { base, labels, shadow })
    }
}

fn build_base_layer(
    regions: &[Region<'_>],
    projection: Projection,
    canvas: (u32, u32),
) -> BaseLayer {
    let outline = projection.outline();
    let shapes = regions
        .iter()
        .map(|region| FilledShape {
            rings: region
                .polygons()
                .map(|ring| ring.iter().map(|&(x, y)| projection.project(x, y)).collect())
                .collect(),
            fill: region.color(),
        })
        .collect();

    let (left, right, top, bottom) = projection.world_bounds();
    let fit_scale =
        (canvas.0 as f64 / (right - left)).min(canvas.1 as f64 / (bottom - top));

    BaseLayer { outline, regions: shapes, canvas, fit_scale }
}

fn compose_labels(candidates: &[LabelCandidate], params: &RenderParams) -> Vec<TextLabel> {
    let mut labels = Vec::new();
    for candidate in candidates {
        if candidate.area < LABEL_MIN_AREA_DEG2 {
            continue;
        }
        let anchor = params.projection.project(candidate.lon, candidate.lat);
        if !anchor.visible {
            continue;
        }
        let clock = params.utc.naive_utc() + candidate.paint.offset;
        let mut lines = Vec::with_capacity(2);
        if params.show_names {
            if let Some(name) = &candidate.paint.name {
                lines.push(name.clone());
            }
        }
        lines.push(clock.format(" %H:%M").to_string());
        labels.push(TextLabel {
            x: anchor.x,
            y: anchor.y,
            lines,
            color: candidate.paint.color,
        });
    }

    // date stamps at the west and east map edges: the map spans a full day,
    // so the corners sit half a day before and after the instant
    let (left, right, top, _) = params.projection.world_bounds();
    for (x, half_day) in [(left, -12), (right, 12)] {
        let date = params.utc + Duration::hours(half_day);
        labels.push(TextLabel {
            x: x * 0.9,
            y: top * 0.9,
            lines: vec![date.format("%Y-%m-%d").to_string()],
            color: EDGE_DATE_COLOR,
        });
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::Log;
    use crate::timezone::{Ring, TimeZoneRecord};
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

    fn world() -> WorldMap {
        Log::set_enabled(false);
        let dir = TimeZoneDirectory::load(vec![
            TimeZoneRecord {
                id: "Etc/GMT-5".into(),
                polygons: vec![square(60.0, 10.0, 20.0)],
            },
            TimeZoneRecord {
                id: "UTC".into(),
                polygons: vec![square(-10.0, 40.0, 20.0)],
            },
        ]);
        Log::set_enabled(true);
        WorldMap::new(dir)
    }

    fn params() -> RenderParams {
        RenderParams {
            utc: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
            projection: Projection::Rectangular,
            show_names: false,
            show_day_night: false,
            canvas: (1000, 550),
        }
    }

    #[test]
    fn zero_canvas_is_rejected() {
        let mut map = world();
        let bad = RenderParams { canvas: (0, 550), ..params() };
        assert!(map.render(&bad).is_err());
    }

    #[test]
    fn base_layer_contains_outline_and_regions() {
        let mut map = world();
        let plan = map.render(&params()).unwrap();
        assert!(!plan.base.outline.is_empty());
        assert_eq!(plan.base.regions.len(), 2);
        // 1000/360 < 550/180
        assert!((plan.base.fit_scale - 1000.0 / 360.0).abs() < 1e-9);
        assert!(plan.shadow.is_none());
    }

    #[test]
    fn ticking_minutes_reuse_both_layers() {
        let mut map = world();
        let first = params();
        map.render(&first).unwrap();
        let later = RenderParams {
            utc: first.utc + Duration::minutes(1),
            ..first
        };
        map.render(&later).unwrap();
        assert_eq!(map.stats(), RenderStats { label_rebuilds: 1, map_rebuilds: 1 });
    }

    #[test]
    fn projection_change_rebuilds_map_but_not_labels() {
        let mut map = world();
        map.render(&params()).unwrap();
        let ortho = RenderParams { projection: Projection::ORTHO_AMERICAS, ..params() };
        map.render(&ortho).unwrap();
        assert_eq!(map.stats(), RenderStats { label_rebuilds: 1, map_rebuilds: 2 });
    }

    #[test]
    fn label_text_matches_local_clock() {
        let mut map = world();
        let plan = map.render(&params()).unwrap();
        let clocks: Vec<&str> = plan
            .labels
            .iter()
            .filter(|l| l.color != EDGE_DATE_COLOR)
            .map(|l| l.lines[0].as_str())
            .collect();
        assert!(clocks.contains(&" 17:00"), "labels: {clocks:?}");
        assert!(clocks.contains(&" 12:00"), "labels: {clocks:?}");
    }

    #[test]
    fn edge_dates_straddle_the_instant() {
        let mut map = world();
        let plan = map.render(&params()).unwrap();
        let dates: Vec<&TextLabel> =
            plan.labels.iter().filter(|l| l.color == EDGE_DATE_COLOR).collect();
        assert_eq!(dates.len(), 2);
        assert_eq!(dates[0].lines, vec!["2024-01-15".to_string()]);
        assert_eq!(dates[1].lines, vec!["2024-01-16".to_string()]);
    }
}
