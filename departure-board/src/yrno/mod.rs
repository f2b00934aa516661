//! yr.no weather forecast.

mod client;
mod convert;
pub mod types;

pub use client::YrnoClient;
pub use convert::convert_forecast;
