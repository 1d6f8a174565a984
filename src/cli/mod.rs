//! Command line interface module
//!
//! Argument parsing and the runner that assembles configuration, service
//! clients and the publishing workflow.

pub mod args;
pub mod runner;

pub use args::Args;
pub use runner::Runner;
