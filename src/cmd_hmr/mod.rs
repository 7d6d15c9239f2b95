//! Subcommand modules for the `hmr` binary.

pub mod dump;
pub mod partition;
