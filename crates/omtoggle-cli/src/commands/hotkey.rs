//! Show or change the persisted toggle hotkey.

use std::path::Path;

use anyhow::{bail, Result};
use omtoggle_core::{
    load_hotkey, save_hotkey, vk_from_name, HotkeyInfo, HOTKEY_FILE, MOD_ALT, MOD_CONTROL,
    MOD_SHIFT,
};

pub fn run(config_dir: &Path, key: Option<&str>, ctrl: bool, alt: bool, shift: bool) -> Result<()> {
    let path = config_dir.join(HOTKEY_FILE);

    let Some(key) = key else {
        if ctrl || alt || shift {
            bail!("--ctrl/--alt/--shift need a --key to modify");
        }
        let hotkey = load_hotkey(&path);
        println!("Current hotkey: {}", hotkey.display_name);
        return Ok(());
    };

    let Some(virtual_key) = vk_from_name(key) else {
        bail!("unknown key name: {key}");
    };

    let mut modifiers = 0;
    if ctrl {
        modifiers |= MOD_CONTROL;
    }
    if alt {
        modifiers |= MOD_ALT;
    }
    if shift {
        modifiers |= MOD_SHIFT;
    }

    let hotkey = HotkeyInfo::new(virtual_key, modifiers);
    save_hotkey(&path, &hotkey)?;
    println!("Hotkey changed to {}", hotkey.display_name);
    Ok(())
}
