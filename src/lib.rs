//! Common functionality for fireplain.
//!
//! Fireplain turns the per-iteration outputs of a wildfire simulation into directed graphs of fire
//! spread between hexagonal cells, then aggregates those graphs over all iterations sharing an
//! ignition point into frequency-weighted "fireplains".
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod burn;
pub mod cli;
pub mod fireplain;
pub mod geometry;
pub mod id;
pub mod input;
pub mod log;
pub mod network;
pub mod output;
pub mod pipeline;
pub mod settings;
pub mod spread;

#[cfg(test)]
mod fixture;

/// Get the directory where fireplain's program settings are stored
pub fn get_fireplain_config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_default();
    path.push("fireplain");
    path
}
