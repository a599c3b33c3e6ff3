//! Map projections from geographic to planar coordinates.
//!
//! Each projection is a pure function of `(longitude, latitude)` in degrees
//! plus its fixed center parameter, producing a planar point and a visibility
//! flag. The set of projections is closed; selection is by enum variant, and
//! variant identity participates in the render cache's map key.
//!
//! Planar coordinates are in the projection's own space with y growing
//! northward. Device transforms (centering, canvas scaling, y flip) are the
//! caller's concern.

use crate::constants::{ORTHO_LIMB_CLIP, ORTHO_RADIUS, OUTLINE_STEP, WAGNER_K};

/// A projected point. `visible` is false for points the drawing surface
/// should skip: near the orthographic limb, or numerically degenerate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
    pub visible: bool,
}

/// The supported projection families.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Equirectangular: the identity map.
    Rectangular,
    /// Wagner VI, a pseudo-cylindrical projection compressing x toward the
    /// poles into a lens-shaped world outline.
    Wagner,
    /// Orthographic hemisphere view centered on the given longitude.
    /// Longitudes are clamped to the visible hemisphere before projecting.
    Orthographic { center: f64 },
}

impl Projection {
    /// Hemisphere centered on the Americas.
    pub const ORTHO_AMERICAS: Self = Self::Orthographic { center: -90.0 };
    /// Hemisphere centered on Europe and Africa.
    pub const ORTHO_EUROPE_AFRICA: Self = Self::Orthographic { center: 20.0 };
    /// Hemisphere centered on Asia and Australia.
    pub const ORTHO_ASIA_AUSTRALIA: Self = Self::Orthographic { center: 100.0 };

    /// Project `(lon, lat)` degrees to planar coordinates.
    ///
    /// Non-finite results are reported as invisible rather than propagated
    /// into the draw plan.
    pub fn project(&self, lon: f64, lat: f64) -> PlanarPoint {
        let point = match *self {
            Self::Rectangular => PlanarPoint { x: lon, y: lat, visible: true },
            Self::Wagner => PlanarPoint {
                x: lon * (1.0 - lat * lat / WAGNER_K).sqrt(),
                y: lat,
                visible: true,
            },
            Self::Orthographic { center } => {
                let x = (lon - center).clamp(-90.0, 90.0);
                PlanarPoint {
                    x: ORTHO_RADIUS * lat.to_radians().cos() * x.to_radians().sin(),
                    y: ORTHO_RADIUS * lat.to_radians().sin(),
                    visible: -ORTHO_LIMB_CLIP < x && x < ORTHO_LIMB_CLIP,
                }
            }
        };
        if point.x.is_finite() && point.y.is_finite() {
            point
        } else {
            PlanarPoint { visible: false, ..point }
        }
    }

    /// The world edge as a closed ring, sampled every [`OUTLINE_STEP`] degrees
    /// along the ±180° meridians so curved projections stay smooth.
    pub fn outline(&self) -> Vec<PlanarPoint> {
        let steps = (180 / OUTLINE_STEP) as usize;
        let mut ring = Vec::with_capacity(2 * steps + 2);
        ring.push(self.project(-180.0, -90.0));
        let mut y = -90;
        while y < 90 {
            ring.push(self.project(180.0, y as f64));
            y += OUTLINE_STEP;
        }
        ring.push(self.project(180.0, 90.0));
        let mut y = 90;
        while y > -90 {
            ring.push(self.project(-180.0, y as f64));
            y -= OUTLINE_STEP;
        }
        ring
    }

    /// Planar extremes `(left, right, top, bottom)` of the projected world,
    /// taken at the equator and the poles. `top` is the projection of the
    /// south pole, so `bottom - top` spans the full world height.
    pub fn world_bounds(&self) -> (f64, f64, f64, f64) {
        let left = self.project(-180.0, 0.0).x;
        let right = self.project(180.0, 0.0).x;
        let top = self.project(0.0, -90.0).y;
        let bottom = self.project(0.0, 90.0).y;
        (left, right, top, bottom)
    }
}
