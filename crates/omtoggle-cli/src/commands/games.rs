//! List supported games and the versions known for each.

use std::path::Path;

use anyhow::Result;
use omtoggle_core::{builtin_versions, GameId, OffsetRegistry};

pub fn run(config_dir: &Path) -> Result<()> {
    let registry = OffsetRegistry::open(config_dir);

    for game in GameId::ALL {
        println!("{} (process: {})", game.display_name(), game.process_name());
        for (version, offset) in builtin_versions(game.process_name()) {
            println!("  {:<16} 0x{}", version, offset.trim_start_matches("0x"));
        }
        for (version, offset) in registry.user_versions(game.process_name()) {
            println!("  {:<16} 0x{}  (user)", version, offset);
        }
        println!();
    }

    Ok(())
}
