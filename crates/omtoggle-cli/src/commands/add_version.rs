//! Add a version→offset entry to the user table.

use std::path::Path;

use anyhow::{bail, Result};
use omtoggle_core::{parse_hex_offset, AddOutcome, GameId, OffsetRegistry};

pub fn run(config_dir: &Path, game: GameId, version: &str, offset: &str) -> Result<()> {
    let mut registry = OffsetRegistry::open(config_dir);

    match registry.add(game.process_name(), version, offset)? {
        AddOutcome::Added => {
            println!(
                "Added {} {} -> 0x{:X}",
                game.display_name(),
                version.trim(),
                parse_hex_offset(offset)?
            );
            Ok(())
        }
        AddOutcome::AlreadyExists => {
            bail!(
                "version {} already exists for {}",
                version.trim(),
                game.display_name()
            )
        }
        AddOutcome::Invalid(reason) => bail!("invalid entry: {}", reason),
    }
}
