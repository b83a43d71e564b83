//! Attach/poll/detach state machine.
//!
//! One tick covers one 500 ms poll: while detached, scan the supported-game
//! list and attach to the first match; while attached, re-read the flag byte
//! and detach on any failure. The hotkey handler calls [`Monitor::toggle`]
//! between ticks.

use std::fmt;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::game::GameId;
use crate::memory::{GameProcess, ProcessCandidate, ProcessProvider};
use crate::offset::OffsetRegistry;

/// Normalize a flag byte and flip it: 0 becomes 1, anything else becomes 0.
pub fn toggle_byte(value: u8) -> u8 {
    let normalized: u8 = if value != 0 { 1 } else { 0 };
    if normalized == 0 { 1 } else { 0 }
}

/// An attached game process with its resolved flag address.
///
/// The target address is only meaningful while the session exists; the
/// monitor drops the whole session on any read or write failure.
pub struct Session<P: GameProcess> {
    process: P,
    pub game: GameId,
    pub pid: u32,
    pub version: String,
    pub base_address: u64,
    pub target_address: u64,
}

impl<P: GameProcess> Session<P> {
    pub fn read_flag(&self) -> Result<u8> {
        self.process.read_byte(self.target_address)
    }

    /// Read, normalize, and write back the flipped flag. Returns the value
    /// written.
    pub fn toggle_flag(&self) -> Result<u8> {
        let next = toggle_byte(self.read_flag()?);
        self.process.write_byte(self.target_address, next)?;
        Ok(next)
    }

    pub fn has_exited(&self) -> bool {
        self.process.has_exited()
    }
}

/// What the monitor is doing, as surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorStatus {
    /// No supported game process is running.
    Scanning,
    /// Attached and reading the flag each tick.
    Attached {
        game: GameId,
        version: String,
        value: u8,
    },
    /// A supported process is running but could not be opened or resolved.
    AttachFailed { game: GameId, message: String },
    /// Attached process version missing from both offset tables.
    UnsupportedVersion { game: GameId, version: String },
    /// Lost the session; polling continues.
    Detached { reason: String },
}

impl fmt::Display for MonitorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scanning => write!(f, "Scanning for a supported game process"),
            Self::Attached {
                game,
                version,
                value,
            } => write!(
                f,
                "Attached to {} {} (on_mission = {})",
                game.display_name(),
                version,
                value
            ),
            Self::AttachFailed { game, message } => {
                write!(f, "Failed to attach to {}: {}", game.display_name(), message)
            }
            Self::UnsupportedVersion { game, version } => {
                write!(f, "Unsupported version {} for {}", version, game.display_name())
            }
            Self::Detached { reason } => write!(f, "Detached: {}", reason),
        }
    }
}

/// Polls for supported games and owns the attached session, if any.
pub struct Monitor<Pr: ProcessProvider> {
    provider: Pr,
    registry: OffsetRegistry,
    session: Option<Session<Pr::Process>>,
    status: MonitorStatus,
}

impl<Pr: ProcessProvider> Monitor<Pr> {
    pub fn new(provider: Pr, registry: OffsetRegistry) -> Self {
        Self {
            provider,
            registry,
            session: None,
            status: MonitorStatus::Scanning,
        }
    }

    pub fn status(&self) -> &MonitorStatus {
        &self.status
    }

    pub fn session(&self) -> Option<&Session<Pr::Process>> {
        self.session.as_ref()
    }

    pub fn registry(&self) -> &OffsetRegistry {
        &self.registry
    }

    /// One poll tick: scan-and-attach while detached, re-read the flag while
    /// attached.
    pub fn tick(&mut self) -> &MonitorStatus {
        let Some(session) = self.session.as_ref() else {
            self.scan();
            return &self.status;
        };

        if session.has_exited() {
            self.detach("process exited");
            return &self.status;
        }

        match session.read_flag() {
            Ok(value) => {
                self.status = MonitorStatus::Attached {
                    game: session.game,
                    version: session.version.clone(),
                    value,
                };
            }
            Err(e) => {
                debug!("Flag read failed: {}", e);
                self.detach("failed to read value");
            }
        }
        &self.status
    }

    /// Toggle the flag byte. Returns the value written, or `None` while
    /// detached. A failed toggle tears the session down.
    pub fn toggle(&mut self) -> Result<Option<u8>> {
        let Some(session) = self.session.as_ref() else {
            return Ok(None);
        };

        match session.toggle_flag() {
            Ok(value) => {
                info!(
                    "Toggled on_mission to {} for {}",
                    value,
                    session.game.display_name()
                );
                self.status = MonitorStatus::Attached {
                    game: session.game,
                    version: session.version.clone(),
                    value,
                };
                Ok(Some(value))
            }
            Err(e) => {
                self.detach("failed to toggle value");
                Err(e)
            }
        }
    }

    /// Drop the session (releasing the process handle) and record why.
    pub fn detach(&mut self, reason: &str) {
        if self.session.take().is_some() {
            warn!("Detached: {}", reason);
        }
        self.status = MonitorStatus::Detached {
            reason: reason.to_string(),
        };
    }

    fn scan(&mut self) {
        for game in GameId::ALL {
            match self.provider.find_and_open(game.process_name()) {
                Ok(None) => continue,
                Ok(Some(candidate)) => {
                    self.attach(game, candidate);
                    return;
                }
                Err(e) => {
                    warn!("Failed to attach to {}: {}", game.display_name(), e);
                    self.status = MonitorStatus::AttachFailed {
                        game,
                        message: e.to_string(),
                    };
                    return;
                }
            }
        }
        self.status = MonitorStatus::Scanning;
    }

    fn attach(&mut self, game: GameId, candidate: ProcessCandidate<Pr::Process>) {
        let ProcessCandidate {
            process,
            pid,
            base_address,
            file_version,
        } = candidate;

        let Some(offset) = self.registry.lookup(game.process_name(), &file_version) else {
            info!(
                "Unsupported version {} for {}",
                file_version,
                game.display_name()
            );
            self.status = MonitorStatus::UnsupportedVersion {
                game,
                version: file_version,
            };
            return;
        };

        let session = Session {
            process,
            game,
            pid,
            version: file_version,
            base_address,
            target_address: base_address + offset,
        };

        match session.read_flag() {
            Ok(value) => {
                info!(
                    "Attached to {} {} (pid {}, base {:#x}, target {:#x})",
                    session.game.display_name(),
                    session.version,
                    session.pid,
                    session.base_address,
                    session.target_address
                );
                self.status = MonitorStatus::Attached {
                    game,
                    version: session.version.clone(),
                    value,
                };
                self.session = Some(session);
            }
            Err(e) => {
                debug!("Initial flag read failed: {}", e);
                self.status = MonitorStatus::Detached {
                    reason: "failed to read value".to_string(),
                };
            }
        }
    }
}
