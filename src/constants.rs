//! Shared constants for projections, region coloring, and label placement.

use crate::utils::Rgb;

/// Degrees between samples when walking the map edge (world outline and the
/// pole-side edges of the day/night shadow polygon).
pub const OUTLINE_STEP: i32 = 5;

/// Radius of the orthographic projection disc, in planar units.
pub const ORTHO_RADIUS: f64 = 90.0;

/// Longitude distance from the orthographic center beyond which points are
/// marked invisible, so outline drawing can skip the limb.
pub const ORTHO_LIMB_CLIP: f64 = 85.0;

/// Denominator of the Wagner VI x-compression term: `x' = x·sqrt(1 − y²/K)`.
pub const WAGNER_K: f64 = 180.0 * 180.0 / 3.0;

/// Degrees between samples of the solar terminator great circle.
pub const TERMINATOR_STEP: i32 = 2;

/// Raster cells per degree used for label placement.
pub const LABEL_GRANULARITY: i32 = 2;

/// Minimum connected-component area, in square degrees, for a label to be
/// drawn. 15 square degrees is 60 raster cells at the current granularity.
/// A tunable cutoff, not a hard law.
pub const LABEL_MIN_AREA_DEG2: f64 = 15.0;

/// Cyclic fill palette for regions, indexed by whole UTC-offset hours modulo
/// the palette length. Fractional offsets blend adjacent entries.
pub const REGION_PALETTE: [Rgb; 4] = [
    Rgb::new(0.80, 0.85, 0.36),
    Rgb::new(0.44, 0.75, 0.40),
    Rgb::new(0.90, 0.85, 0.50),
    Rgb::new(0.73, 0.72, 0.35),
];

/// Fill for the region of zones with no resolvable local time.
pub const UNKNOWN_REGION_COLOR: Rgb = Rgb::new(0.8, 0.8, 0.8);

/// Fill behind the region polygons (the world outline interior).
pub const OCEAN_COLOR: Rgb = Rgb::new(0.2, 0.3, 0.5);

/// Stroke used for the outline and region borders.
pub const BORDER_COLOR: Rgb = Rgb::new(0.0, 0.0, 0.0);

/// Text color for the west/east edge date stamps.
pub const EDGE_DATE_COLOR: Rgb = Rgb::new(0.8, 0.8, 0.8);

/// Opacity of the night-side shadow polygon (the shadow itself is black).
pub const SHADOW_OPACITY: f32 = 0.3;
