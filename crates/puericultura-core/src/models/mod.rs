//! Domain models for the puericultura system.

mod patient;
mod reference;
mod vaccine;

pub use patient::*;
pub use reference::*;
pub use vaccine::*;
