//! System-wide hotkey registration.
//!
//! The hotkey is registered against the calling thread (no window), so
//! `WM_HOTKEY` lands in the thread's message queue and is drained by
//! [`GlobalHotkey::poll`] from the same loop that polls the game process.

#![cfg(target_os = "windows")]

use tracing::debug;

use super::HotkeyInfo;
use crate::error::{Error, Result};

/// A registered system-wide hotkey, unregistered on drop.
///
/// `poll` must be called from the thread that called `register`.
pub struct GlobalHotkey {
    id: i32,
}

impl GlobalHotkey {
    /// Register `hotkey` for the calling thread under the given id.
    pub fn register(id: i32, hotkey: &HotkeyInfo) -> Result<Self> {
        use windows::Win32::UI::Input::KeyboardAndMouse::{RegisterHotKey, HOT_KEY_MODIFIERS};

        // SAFETY: a None window handle ties the hotkey to the calling thread's
        // message queue.
        unsafe {
            RegisterHotKey(
                None,
                id,
                HOT_KEY_MODIFIERS(hotkey.modifiers),
                hotkey.virtual_key,
            )
        }
        .map_err(|e| {
            Error::HotkeyRegistrationFailed(format!(
                "{} may already be taken by another application: {}",
                hotkey.display_name, e
            ))
        })?;

        debug!("Registered global hotkey {} (id {})", hotkey.display_name, id);
        Ok(Self { id })
    }

    /// Drain pending `WM_HOTKEY` messages for this thread.
    ///
    /// Returns true if this hotkey fired at least once since the last poll;
    /// repeated presses within one poll interval collapse into one toggle.
    pub fn poll(&self) -> bool {
        use windows::Win32::UI::WindowsAndMessaging::{PeekMessageW, MSG, PM_REMOVE, WM_HOTKEY};

        let mut fired = false;
        let mut msg = MSG::default();
        // SAFETY: PeekMessageW with a WM_HOTKEY filter only removes hotkey
        // messages posted to this thread's queue.
        while unsafe { PeekMessageW(&mut msg, None, WM_HOTKEY, WM_HOTKEY, PM_REMOVE) }.as_bool() {
            if msg.message == WM_HOTKEY && msg.wParam.0 == self.id as usize {
                fired = true;
            }
        }
        fired
    }
}

impl Drop for GlobalHotkey {
    fn drop(&mut self) {
        use windows::Win32::UI::Input::KeyboardAndMouse::UnregisterHotKey;

        // SAFETY: unregistering an id this thread registered earlier.
        unsafe {
            let _ = UnregisterHotKey(None, self.id);
        }
    }
}
