//! Database models for persistent storage.

mod definition;
mod dependent;
mod tenant;

pub use definition::*;
pub use dependent::*;
pub use tenant::*;
