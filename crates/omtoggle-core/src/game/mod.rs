//! The supported game titles.
//!
//! The three Definitive Edition executables share one flag layout; they only
//! differ in process name and per-version offset. The process name doubles as
//! the key into both offset tables.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum GameId {
    SanAndreas,
    ViceCity,
    LibertyCity,
}

impl GameId {
    /// All supported games, in attach-scan order.
    pub const ALL: [GameId; 3] = [GameId::SanAndreas, GameId::ViceCity, GameId::LibertyCity];

    /// Executable name without the `.exe` suffix.
    pub fn process_name(&self) -> &'static str {
        self.into()
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SanAndreas => "GTA: San Andreas DE",
            Self::ViceCity => "GTA: Vice City DE",
            Self::LibertyCity => "GTA III DE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn process_name_matches_variant() {
        assert_eq!(GameId::SanAndreas.process_name(), "SanAndreas");
        assert_eq!(GameId::LibertyCity.process_name(), "LibertyCity");
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(GameId::from_str("vicecity").unwrap(), GameId::ViceCity);
        assert_eq!(GameId::from_str("SanAndreas").unwrap(), GameId::SanAndreas);
        assert!(GameId::from_str("ViceCity2").is_err());
    }
}
