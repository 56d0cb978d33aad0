//! AnnoKit Settings Crate
//!
//! Handles annotation drawing configuration and its persistence.

pub mod config;
pub mod error;

pub use config::{Config, DrawingSettings, PickingSettings};
pub use error::{SettingsError, SettingsResult};
