//! Vaccination schedule engine.
//!
//! A static calendar of dose rules and a pure status function of the
//! child's age on a reference date. Applied doses are tracked by the caller.

mod calendar;
mod status;

pub use calendar::*;
pub use status::*;
