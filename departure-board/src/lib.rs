//! Departure board for Vienna.
//!
//! Collects realtime departures from Wiener Linien and ÖBB, Citybike Wien
//! station occupancy and a yr.no forecast, merges them by station and
//! renders the result for a tri-colour e-paper panel.

pub mod aggregate;
pub mod citybike;
pub mod config;
pub mod controller;
pub mod display;
pub mod domain;
pub mod error;
pub mod oebb;
pub mod render;
pub mod scheduler;
pub mod source;
pub mod sources;
pub mod wrlinien;
pub mod yrno;
