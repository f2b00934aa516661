//! Wiener Linien realtime monitor (trams, buses, underground).

mod client;
mod convert;
pub mod types;

pub use client::WrLinienClient;
pub use convert::convert_monitor;
