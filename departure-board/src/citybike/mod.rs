//! Citybike Wien bike-share availability.

mod client;
mod convert;
pub mod types;

pub use client::CitybikeClient;
pub use convert::convert_stations;
