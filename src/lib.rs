//! # Zonemap Library
//!
//! Computation engine for a world map of time zones: which regions share the
//! same local time at a chosen instant, colored by UTC offset, with an
//! optional day/night terminator and several map projections.
//!
//! ## Architecture
//!
//! The library is organized in layers, leaves first:
//!
//! - **Projections**: `projection` maps geographic to planar coordinates
//!   with visibility clipping
//! - **Solar**: `solar` computes the subsolar point from a UTC instant
//! - **Time Zones**: `timezone` owns the polygon dataset and resolves local
//!   time and names through the tz database
//! - **Regions**: `region` groups zones that display the same local time,
//!   assigning palette colors by UTC offset
//! - **Terminator**: `terminator` builds the day/night shadow polygon
//! - **Labels**: `labels` rasterizes regions and flood-fills label candidates
//! - **Rendering**: `render` holds the layer caches and exposes
//!   [`WorldMap::render`], the one entry point the drawing surface consumes
//!
//! The host application owns windowing, widgets, device transforms, and the
//! offline dataset preparation; this crate only turns the loaded dataset and
//! the current control values into a draw plan.

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod constants;
pub mod labels;
pub mod projection;
pub mod region;
pub mod render;
pub mod solar;
pub mod terminator;
pub mod timezone;
pub mod utils;

// Re-exports for the host application
pub use labels::{LabelCandidate, RegionPaint, place_labels};
pub use projection::{PlanarPoint, Projection};
pub use region::{Region, RegionKey, color_for_offset, get_regions};
pub use render::{
    BaseLayer, DrawPlan, FilledShape, RenderParams, RenderStats, TextLabel, WorldMap,
};
pub use solar::{SunPosition, sun_position};
pub use terminator::{TerminatorShape, terminator};
pub use timezone::{Ring, TimeZone, TimeZoneDirectory, TimeZoneRecord};
pub use utils::Rgb;
