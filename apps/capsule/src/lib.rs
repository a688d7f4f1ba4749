//! # capsule
//!
//! Build-step companion for the capsule catalog: configuration loading and
//! the read-only CLI commands. The binary in `main.rs` is a thin wrapper that
//! installs logging and dispatches to [`cli::execute`].

pub mod cli;
pub mod config;
