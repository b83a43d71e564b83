//! CLI command implementations.

pub mod add_version;
pub mod games;
pub mod hotkey;
pub mod run;
