//! Configuration management for portsweep.
//!
//! Provides XDG-compliant paths and the persisted application settings.

mod settings;

pub use settings::{AppSettings, Paths};
