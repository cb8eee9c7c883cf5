//! Weighted scoring: per-question answer tables and zone bucketing of the total.

pub mod accumulator;
pub mod table;
pub mod zone;

pub use accumulator::{ScoreAccumulator, ScoreSheet};
pub use table::{ScoreTable, Selection};
pub use zone::{LoadColor, LoadZone, ZoneScale, percent_of_range};
