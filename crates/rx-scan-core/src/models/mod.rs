//! Domain models for the rx-scan system.

mod catalog;
mod mention;
mod report;

pub use catalog::*;
pub use mention::*;
pub use report::*;
