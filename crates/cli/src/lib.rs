//! Command-line front ends for `dx`: `export-diagrams` and `deck-config`.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod styles;
