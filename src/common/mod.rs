//! # Common Components
//!
//! Shared utilities used by the library and the `steg` binary.
//!
//! ## Modules
//!
//! - [`config`]: Configuration parsing utilities

pub mod config;
