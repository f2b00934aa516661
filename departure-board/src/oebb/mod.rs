//! ÖBB timetable (S-Bahn and regional trains).

mod client;
mod convert;
mod session;
pub mod types;

pub use client::OebbClient;
pub use convert::{convert_connections, normalize};
