//! Domain types for the departure board.
//!
//! Every provider normalizes its payload into these types before anything
//! else sees it, so the aggregator and renderer never deal with
//! provider-shaped data.

mod merge;
mod snapshot;
mod station;
mod weather;

pub use merge::{Rename, apply_renames, collapse_lines, merge_lines_by_direction, merge_stations_by_name};
pub use snapshot::DisplaySnapshot;
pub use station::{BikeStationInfo, Line, Station, TransitBoard};
pub use weather::{Credit, ForecastEntry, Symbol, WeatherSnapshot, Wind};
