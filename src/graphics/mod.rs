//! Vector graphics: path operators to line and rectangle hints.

pub mod path_tracker;
mod style;

pub use path_tracker::{PathState, PathTracker};
pub use style::{resolve_style, to_rgb};
