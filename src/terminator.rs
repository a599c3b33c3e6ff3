//! Day/night terminator construction.
//!
//! Samples the great circle separating day from night at a fixed angular
//! step, then closes it into a shadow polygon by walking the map edge from
//! the night-side pole down to the boundary curve and back up on the other
//! side. The filled polygon covers the night hemisphere as seen in the given
//! projection.

use chrono::{DateTime, Utc};

use crate::constants::{OUTLINE_STEP, TERMINATOR_STEP};
use crate::projection::{PlanarPoint, Projection};
use crate::solar::sun_position;

/// The projected shadow outline, filled black at
/// [`crate::constants::SHADOW_OPACITY`] by the renderer. `dark_pole` is +1
/// when the north pole is on the night side, -1 when the south pole is.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminatorShape {
    pub points: Vec<PlanarPoint>,
    pub dark_pole: i8,
}

/// Build the shadow polygon for the given instant, projected with the given
/// projection. Rebuilt on every request; changes with both the instant and
/// the projection, never with regions or labels.
pub fn terminator(utc: DateTime<Utc>, projection: Projection) -> TerminatorShape {
    let sun = sun_position(utc);
    let (lat, lon) = (sun.declination, sun.hour_angle);

    // boundary points of the terminator circle, in degrees
    let mut boundary = Vec::with_capacity((360 / TERMINATOR_STEP) as usize);
    let mut step = 0;
    while step < 360 {
        let p = (step as f64).to_radians();
        let a = -lat.sin() * p.sin();
        let x = a * lon.cos() - lon.sin() * p.cos();
        let y = a * lon.sin() + lon.cos() * p.cos();
        boundary.push((y.atan2(x).to_degrees(), (lat.cos() * p.sin()).asin().to_degrees()));
        step += TERMINATOR_STEP;
    }
    boundary.sort_by(|a, b| a.0.total_cmp(&b.0));

    let dark_pole: i8 = if lat > 0.0 { 1 } else { -1 };
    let pole = 90 * dark_pole as i32;
    // latitude where the curve meets the map edges, averaged over the two
    // endpoints so both sides join without a gap
    let edge_lat = (boundary[0].1 + boundary[boundary.len() - 1].1) / 2.0;
    let edge_stop = edge_lat.round() as i32;

    let steps = (180 / OUTLINE_STEP) as usize;
    let mut points = Vec::with_capacity(boundary.len() + 2 * steps + 4);

    // west edge, from the dark pole down to the curve
    points.push(projection.project(-180.0, pole as f64));
    let descent = -OUTLINE_STEP * dark_pole as i32;
    let mut y = pole;
    while (descent < 0 && y > edge_stop) || (descent > 0 && y < edge_stop) {
        points.push(projection.project(-180.0, y as f64));
        y += descent;
    }
    points.push(projection.project(-180.0, edge_lat));

    // the boundary curve itself
    for &(bx, by) in &boundary {
        points.push(projection.project(bx, by));
    }

    // east edge, from the curve back up to the dark pole
    let ascent = -descent;
    let mut y = edge_stop;
    while (ascent > 0 && y < pole) || (ascent < 0 && y > pole) {
        points.push(projection.project(180.0, y as f64));
        y += ascent;
    }
    points.push(projection.project(180.0, pole as f64));

    TerminatorShape { points, dark_pole }
}
