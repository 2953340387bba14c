//! Command line interface.

mod commands;
mod helpers;

pub use commands::{is_verbose, run, Cli};
