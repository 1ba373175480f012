//! Support library for the `ris` binary.
//!
//! Exposes the command pipeline and logging setup so doctests and
//! integration tests can drive the CLI without spawning a process.

pub mod cli;
pub mod logging;
