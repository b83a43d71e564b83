//! Process discovery and single-byte memory access.
//!
//! The monitor only ever touches one byte of the target, so the seam is
//! deliberately narrow: a [`ProcessProvider`] finds and opens a process by
//! name, and the opened [`GameProcess`] reads and writes single bytes.

#[cfg(target_os = "windows")]
mod process;

#[cfg(test)]
pub mod mock;

#[cfg(target_os = "windows")]
pub use process::{file_version, find_pid_by_name, ProcessHandle, WindowsProcessProvider};

use crate::error::Result;

/// An attached process open for byte-level memory access.
pub trait GameProcess {
    fn read_byte(&self, address: u64) -> Result<u8>;
    fn write_byte(&self, address: u64, value: u8) -> Result<()>;
    /// Whether the underlying process has terminated.
    fn has_exited(&self) -> bool;
}

/// A freshly opened process, along with everything attach needs to resolve
/// the target address.
pub struct ProcessCandidate<P> {
    pub process: P,
    pub pid: u32,
    pub base_address: u64,
    pub file_version: String,
}

/// Finds a running process by executable name and opens it for memory access.
pub trait ProcessProvider {
    type Process: GameProcess;

    /// Look for a running process named `process_name` (no `.exe` suffix).
    ///
    /// `Ok(None)` means no such process is running; `Err` means one was found
    /// but could not be opened or resolved.
    fn find_and_open(&self, process_name: &str) -> Result<Option<ProcessCandidate<Self::Process>>>;
}
