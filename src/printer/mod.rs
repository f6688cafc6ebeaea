//! # Printer Module
//!
//! This module provides printer-specific configurations and utilities.
//!
//! ## Modules
//!
//! - [`config`]: Printer hardware specifications and default print parameters

pub mod config;

pub use config::PrinterConfig;
