//! # omtoggle-core
//!
//! Core library for the on_mission flag toggler.
//!
//! This crate provides:
//! - The supported-game list and the version→offset registry (compiled-in
//!   table plus a user table persisted to JSON)
//! - Windows process discovery and single-byte memory access behind a
//!   provider trait, so the monitor runs against mocks in tests
//! - The attach/poll/detach monitor state machine
//! - Hotkey configuration and system-wide hotkey registration

pub mod error;
pub mod game;
pub mod hotkey;
pub mod memory;
pub mod monitor;
pub mod offset;

pub use error::{Error, Result};
pub use game::GameId;
pub use hotkey::{
    display_name, key_name, load_hotkey, save_hotkey, vk_from_name, HotkeyInfo, HOTKEY_FILE,
    MOD_ALT, MOD_CONTROL, MOD_SHIFT,
};
pub use memory::{GameProcess, ProcessCandidate, ProcessProvider};
pub use monitor::{toggle_byte, Monitor, MonitorStatus, Session};
pub use offset::{
    builtin_versions, parse_hex_offset, AddOutcome, OffsetRegistry, USER_OFFSETS_FILE,
};

#[cfg(target_os = "windows")]
pub use hotkey::GlobalHotkey;
#[cfg(target_os = "windows")]
pub use memory::{ProcessHandle, WindowsProcessProvider};
