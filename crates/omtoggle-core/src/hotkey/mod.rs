//! Toggle hotkey configuration.
//!
//! The hotkey is stored as a Win32 virtual-key code plus a modifier bitmask
//! (the `RegisterHotKey` encoding) along with a human-readable display string,
//! persisted to `hotkey_config.json`. A missing or unparsable file falls back
//! to the default of F6 with no modifier.

mod listener;

#[cfg(target_os = "windows")]
pub use listener::GlobalHotkey;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Hotkey config file name
pub const HOTKEY_FILE: &str = "hotkey_config.json";

/// Modifier bits, matching the Win32 `MOD_*` hotkey values.
pub const MOD_ALT: u32 = 0x0001;
pub const MOD_CONTROL: u32 = 0x0002;
pub const MOD_SHIFT: u32 = 0x0004;

/// Virtual key for F6, the default toggle key.
const VK_F6: u32 = 0x75;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotkeyInfo {
    pub virtual_key: u32,
    pub modifiers: u32,
    pub display_name: String,
}

impl HotkeyInfo {
    /// Build a hotkey with its display name composed from the key and modifiers.
    pub fn new(virtual_key: u32, modifiers: u32) -> Self {
        Self {
            virtual_key,
            modifiers,
            display_name: display_name(virtual_key, modifiers),
        }
    }
}

impl Default for HotkeyInfo {
    fn default() -> Self {
        Self::new(VK_F6, 0)
    }
}

/// Load the hotkey from `path`, falling back to the default on any failure.
pub fn load_hotkey(path: &Path) -> HotkeyInfo {
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<HotkeyInfo>(&content) {
            Ok(hotkey) => hotkey,
            Err(e) => {
                warn!(
                    "Failed to parse {}: {}, using default hotkey",
                    path.display(),
                    e
                );
                HotkeyInfo::default()
            }
        },
        Err(e) => {
            debug!("Hotkey config not found or unreadable: {}", e);
            HotkeyInfo::default()
        }
    }
}

/// Persist the hotkey to `path` as pretty-printed JSON.
pub fn save_hotkey(path: &Path, hotkey: &HotkeyInfo) -> crate::error::Result<()> {
    let content = serde_json::to_string_pretty(hotkey)?;
    fs::write(path, content)?;
    Ok(())
}

/// Compose the display string, `Ctrl+Alt+Shift+Key`.
pub fn display_name(virtual_key: u32, modifiers: u32) -> String {
    let mut out = String::new();
    if modifiers & MOD_CONTROL != 0 {
        out.push_str("Ctrl+");
    }
    if modifiers & MOD_ALT != 0 {
        out.push_str("Alt+");
    }
    if modifiers & MOD_SHIFT != 0 {
        out.push_str("Shift+");
    }
    match key_name(virtual_key) {
        Some(name) => out.push_str(&name),
        None => out.push_str(&format!("VK 0x{:02X}", virtual_key)),
    }
    out
}

/// Human-readable name for a virtual-key code, if it is one we accept.
pub fn key_name(virtual_key: u32) -> Option<String> {
    let name = match virtual_key {
        0x30..=0x39 => ((b'0' + (virtual_key - 0x30) as u8) as char).to_string(),
        0x41..=0x5A => ((b'A' + (virtual_key - 0x41) as u8) as char).to_string(),
        0x60..=0x69 => format!("Numpad {}", virtual_key - 0x60),
        0x70..=0x87 => format!("F{}", virtual_key - 0x70 + 1),
        0x20 => "Space".to_string(),
        0xC0 => "`".to_string(),
        0xBD => "-".to_string(),
        0xBB => "=".to_string(),
        0xDB => "[".to_string(),
        0xDD => "]".to_string(),
        0xDC => "\\".to_string(),
        0xBA => ";".to_string(),
        0xDE => "'".to_string(),
        0xBC => ",".to_string(),
        0xBE => ".".to_string(),
        0xBF => "/".to_string(),
        _ => return None,
    };
    Some(name)
}

/// Parse a key name back to its virtual-key code. Accepts the same names
/// [`key_name`] produces, case-insensitively.
pub fn vk_from_name(name: &str) -> Option<u32> {
    let name = name.trim();

    if name.eq_ignore_ascii_case("space") {
        return Some(0x20);
    }

    // F1..F24
    if let Some(number) = name
        .strip_prefix('F')
        .or_else(|| name.strip_prefix('f'))
        .and_then(|n| n.parse::<u32>().ok())
    {
        if (1..=24).contains(&number) {
            return Some(0x70 + number - 1);
        }
        return None;
    }

    // "Numpad 0".."Numpad 9"
    if let Some(digit) = name
        .get(..6)
        .filter(|p| p.eq_ignore_ascii_case("numpad"))
        .and_then(|_| name[6..].trim().parse::<u32>().ok())
    {
        if digit <= 9 {
            return Some(0x60 + digit);
        }
        return None;
    }

    if name.len() == 1 {
        let c = name.chars().next()?;
        return match c {
            '0'..='9' => Some(0x30 + c as u32 - '0' as u32),
            'a'..='z' => Some(0x41 + c.to_ascii_uppercase() as u32 - 'A' as u32),
            'A'..='Z' => Some(0x41 + c as u32 - 'A' as u32),
            '`' => Some(0xC0),
            '-' => Some(0xBD),
            '=' => Some(0xBB),
            '[' => Some(0xDB),
            ']' => Some(0xDD),
            '\\' => Some(0xDC),
            ';' => Some(0xBA),
            '\'' => Some(0xDE),
            ',' => Some(0xBC),
            '.' => Some(0xBE),
            '/' => Some(0xBF),
            _ => None,
        };
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_is_f6_without_modifiers() {
        let hotkey = HotkeyInfo::default();
        assert_eq!(hotkey.virtual_key, 0x75);
        assert_eq!(hotkey.modifiers, 0);
        assert_eq!(hotkey.display_name, "F6");
    }

    #[test]
    fn display_name_orders_modifiers() {
        assert_eq!(display_name(0x75, MOD_CONTROL | MOD_SHIFT), "Ctrl+Shift+F6");
        assert_eq!(
            display_name(0x41, MOD_ALT | MOD_CONTROL | MOD_SHIFT),
            "Ctrl+Alt+Shift+A"
        );
        assert_eq!(display_name(0x62, 0), "Numpad 2");
    }

    #[test]
    fn display_name_falls_back_to_raw_code() {
        assert_eq!(display_name(0x13, 0), "VK 0x13");
    }

    #[test]
    fn key_names_round_trip() {
        for vk in [0x30, 0x39, 0x41, 0x5A, 0x60, 0x69, 0x70, 0x87, 0x20, 0xC0, 0xBF] {
            let name = key_name(vk).unwrap();
            assert_eq!(vk_from_name(&name), Some(vk), "vk {:#x} ({})", vk, name);
        }
    }

    #[test]
    fn vk_from_name_is_case_insensitive() {
        assert_eq!(vk_from_name("f6"), Some(0x75));
        assert_eq!(vk_from_name("numpad 3"), Some(0x63));
        assert_eq!(vk_from_name("q"), Some(0x51));
        assert_eq!(vk_from_name("SPACE"), Some(0x20));
    }

    #[test]
    fn vk_from_name_rejects_unknown_keys() {
        assert_eq!(vk_from_name("F25"), None);
        assert_eq!(vk_from_name("Numpad 12"), None);
        assert_eq!(vk_from_name("Escape"), None);
        assert_eq!(vk_from_name(""), None);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(HOTKEY_FILE);
        let hotkey = HotkeyInfo::new(0x42, MOD_CONTROL);
        save_hotkey(&path, &hotkey).unwrap();
        assert_eq!(load_hotkey(&path), hotkey);
        assert_eq!(load_hotkey(&path).display_name, "Ctrl+B");
    }

    #[test]
    fn load_falls_back_on_missing_or_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(HOTKEY_FILE);
        assert_eq!(load_hotkey(&path), HotkeyInfo::default());

        std::fs::write(&path, "{broken").unwrap();
        assert_eq!(load_hotkey(&path), HotkeyInfo::default());
    }
}
