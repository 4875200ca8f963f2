//! Subcommand implementations

pub mod analysis;
pub mod catalog;
pub mod clusters;
