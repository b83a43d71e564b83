//! The monitor loop: poll for a supported game, pump the hotkey, toggle.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;

/// How often the hotkey queue is drained between poll ticks. Short enough
/// that a press feels immediate against the 500 ms process poll.
#[cfg(target_os = "windows")]
const PUMP_INTERVAL: Duration = Duration::from_millis(25);

#[cfg(target_os = "windows")]
const HOTKEY_ID: i32 = 1;

#[cfg(target_os = "windows")]
pub fn run(config_dir: &Path, interval: Duration) -> Result<()> {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    use omtoggle_core::{
        load_hotkey, GlobalHotkey, Monitor, OffsetRegistry, WindowsProcessProvider, HOTKEY_FILE,
    };
    use owo_colors::OwoColorize;
    use tracing::{debug, info, warn};

    let hotkey = load_hotkey(&config_dir.join(HOTKEY_FILE));
    let registry = OffsetRegistry::open(config_dir);
    let mut monitor = Monitor::new(WindowsProcessProvider, registry);

    let listener = GlobalHotkey::register(HOTKEY_ID, &hotkey)?;
    info!("Toggle hotkey: {}", hotkey.display_name);

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        ctrlc::set_handler(move || shutdown.store(true, Ordering::SeqCst))?;
    }

    let mut last_status = None;
    let mut next_tick = Instant::now();
    while !shutdown.load(Ordering::SeqCst) {
        if Instant::now() >= next_tick {
            let status = monitor.tick().clone();
            if last_status.as_ref() != Some(&status) {
                report(&status, &hotkey.display_name);
                last_status = Some(status);
            }
            next_tick += interval;
        }

        if listener.poll() {
            match monitor.toggle() {
                Ok(Some(value)) => println!("on_mission = {}", value.green()),
                Ok(None) => debug!("Hotkey pressed while detached"),
                Err(e) => warn!("Toggle failed: {}", e),
            }
        }

        std::thread::sleep(PUMP_INTERVAL);
    }

    monitor.detach("shutting down");
    info!("Shutting down");
    Ok(())
}

#[cfg(target_os = "windows")]
fn report(status: &omtoggle_core::MonitorStatus, hotkey_name: &str) {
    use omtoggle_core::MonitorStatus;
    use owo_colors::OwoColorize;

    match status {
        MonitorStatus::Scanning => {
            println!("Scanning for a supported game process...");
        }
        MonitorStatus::Attached {
            game,
            version,
            value,
        } => {
            println!(
                "{} (press {} to toggle, on_mission = {})",
                format!("Attached to {} {}", game.display_name(), version).green(),
                hotkey_name,
                value
            );
        }
        MonitorStatus::AttachFailed { .. } | MonitorStatus::UnsupportedVersion { .. } => {
            println!("{}", status.to_string().red());
            if let MonitorStatus::UnsupportedVersion { .. } = status {
                println!("Add an offset for it with `omtoggle add-version`.");
            }
        }
        MonitorStatus::Detached { .. } => {
            println!("{}", status.to_string().red());
        }
    }
}

#[cfg(not(target_os = "windows"))]
pub fn run(_config_dir: &Path, _interval: Duration) -> Result<()> {
    anyhow::bail!("the monitor loop is only supported on Windows")
}
