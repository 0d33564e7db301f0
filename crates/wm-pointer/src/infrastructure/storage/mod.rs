//! Storage infrastructure for the provider.
//!
//! Handles persistence of the provider's configuration to the
//! platform-appropriate location on disk.

pub mod config;
