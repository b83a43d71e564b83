use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::builtin;
use crate::error::{Error, Result};

/// User table file name
pub const USER_OFFSETS_FILE: &str = "additional_addresses.json";

/// game name → (version string → hex offset, stored without the `0x` prefix)
type UserTable = BTreeMap<String, BTreeMap<String, String>>;

/// Outcome of [`OffsetRegistry::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyExists,
    Invalid(&'static str),
}

/// Resolves (game, file version) to an offset from the module base.
///
/// The compiled-in table is consulted first, then the user table. Within each
/// table an exact version match wins; failing that, any stored version sharing
/// the probe's first three dot-separated components matches (smallest such
/// version string, so repeated lookups agree).
pub struct OffsetRegistry {
    user_path: PathBuf,
    user: UserTable,
}

impl OffsetRegistry {
    /// Open the registry with the user table at `dir/additional_addresses.json`.
    pub fn open<P: AsRef<Path>>(dir: P) -> Self {
        Self::with_file(dir.as_ref().join(USER_OFFSETS_FILE))
    }

    /// Open the registry with the user table at an explicit path.
    pub fn with_file<P: Into<PathBuf>>(path: P) -> Self {
        let mut registry = Self {
            user_path: path.into(),
            user: UserTable::new(),
        };
        registry.reload();
        registry
    }

    /// Re-read the user table from disk, dropping the in-memory copy.
    ///
    /// A missing or unparsable file degrades to an empty table.
    pub fn reload(&mut self) {
        self.user = match fs::read_to_string(&self.user_path) {
            Ok(content) => match serde_json::from_str::<UserTable>(&content) {
                Ok(table) => {
                    debug!(
                        "Loaded {} user offset entries from {}",
                        table.values().map(|v| v.len()).sum::<usize>(),
                        self.user_path.display()
                    );
                    table
                }
                Err(e) => {
                    warn!(
                        "Failed to parse {}: {}, ignoring user offsets",
                        self.user_path.display(),
                        e
                    );
                    UserTable::new()
                }
            },
            Err(e) => {
                debug!("User offset table not found or unreadable: {}", e);
                UserTable::new()
            }
        };
    }

    /// Look up the offset for a game and file version.
    pub fn lookup(&self, game: &str, version: &str) -> Option<u64> {
        let version = version.trim();
        if version.is_empty() {
            return None;
        }

        let hardcoded = builtin::builtin_versions(game).iter().copied();
        if let Some(offset) = lookup_entries(hardcoded, version) {
            return Some(offset);
        }

        let user = self
            .user
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(game))
            .map(|(_, versions)| versions)?;
        lookup_entries(
            user.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            version,
        )
    }

    /// Add a version→offset entry to the user table and persist it.
    ///
    /// The table is reloaded from disk first so an entry added by an external
    /// edit since startup is not clobbered. A version already present in the
    /// user table for that game is left untouched.
    pub fn add(&mut self, game: &str, version: &str, hex_offset: &str) -> Result<AddOutcome> {
        let game = game.trim();
        let version = version.trim();
        let hex_offset = hex_offset.trim();
        if game.is_empty() || version.is_empty() || hex_offset.is_empty() {
            return Ok(AddOutcome::Invalid("blank game, version, or offset"));
        }

        let cleaned = strip_hex_prefix(hex_offset);
        if parse_hex_offset(cleaned).is_err() {
            return Ok(AddOutcome::Invalid("offset is not a hex number"));
        }

        self.reload();

        // Reuse an existing game key that differs only in case.
        let key = self
            .user
            .keys()
            .find(|name| name.eq_ignore_ascii_case(game))
            .cloned()
            .unwrap_or_else(|| game.to_string());
        let versions = self.user.entry(key).or_default();

        if versions.keys().any(|k| k.eq_ignore_ascii_case(version)) {
            return Ok(AddOutcome::AlreadyExists);
        }

        versions.insert(version.to_string(), cleaned.to_string());
        self.save()?;
        info!("Added user offset: {} {} -> {}", game, version, cleaned);
        Ok(AddOutcome::Added)
    }

    /// User-table entries known for a game, sorted by version string.
    pub fn user_versions(&self, game: &str) -> Vec<(&str, &str)> {
        self.user
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(game))
            .map(|(_, versions)| {
                versions
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.user)?;
        fs::write(&self.user_path, content)?;
        Ok(())
    }
}

/// Parse a hex offset string, with or without a `0x` prefix.
pub fn parse_hex_offset(raw: &str) -> Result<u64> {
    let cleaned = strip_hex_prefix(raw.trim());
    u64::from_str_radix(cleaned, 16).map_err(|_| Error::InvalidOffset(raw.to_string()))
}

fn strip_hex_prefix(raw: &str) -> &str {
    raw.strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw)
}

/// Exact match first; on miss, any stored version sharing the probe's first
/// three dot-separated components (smallest version string wins).
fn lookup_entries<'a, I>(entries: I, version: &str) -> Option<u64>
where
    I: Iterator<Item = (&'a str, &'a str)> + Clone,
{
    let exact = entries
        .clone()
        .find(|(stored, _)| stored.eq_ignore_ascii_case(version))
        .and_then(|(_, raw)| parse_hex_offset(raw).ok());
    if exact.is_some() {
        return exact;
    }

    let prefix = version_prefix(version);
    entries
        .filter(|(stored, _)| starts_with_ignore_case(stored, &prefix))
        .min_by(|a, b| a.0.cmp(b.0))
        .and_then(|(_, raw)| parse_hex_offset(raw).ok())
}

/// First three dot-separated components, with a trailing dot so `1.0.17`
/// matches `1.0.17.38838` but not `1.0.170.x`.
fn version_prefix(version: &str) -> String {
    let components: Vec<&str> = version.split('.').take(3).collect();
    format!("{}.", components.join("."))
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn registry_in(dir: &TempDir) -> OffsetRegistry {
        OffsetRegistry::open(dir.path())
    }

    #[test]
    fn exact_match_returns_stored_offset() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);
        assert_eq!(
            registry.lookup("SanAndreas", "1.0.0.14296"),
            Some(0x500CD78)
        );
        assert_eq!(registry.lookup("ViceCity", "1.0.0.14296"), Some(0x4E68394));
    }

    #[test]
    fn game_and_version_match_case_insensitively() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);
        assert_eq!(
            registry.lookup("sanandreas", "1.0.0.14296"),
            Some(0x500CD78)
        );
    }

    #[test]
    fn prefix_match_when_no_exact_version() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);
        // 1.0.17.99999 is unknown, but 1.0.17.* entries exist; the smallest
        // version string sharing the prefix is 1.0.17.38838.
        assert_eq!(
            registry.lookup("SanAndreas", "1.0.17.99999"),
            Some(0x513003C)
        );
    }

    #[test]
    fn prefix_match_requires_component_boundary() {
        let dir = TempDir::new().unwrap();
        let mut registry = registry_in(&dir);
        registry.add("SanAndreas", "2.0.10.1", "AA0").unwrap();
        // Prefix "2.0.1." must not match the stored "2.0.10.1".
        assert_eq!(registry.lookup("SanAndreas", "2.0.1.5"), None);
        assert_eq!(registry.lookup("SanAndreas", "2.0.10.9"), Some(0xAA0));
    }

    #[test]
    fn blank_version_never_matches() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);
        assert_eq!(registry.lookup("SanAndreas", ""), None);
        assert_eq!(registry.lookup("SanAndreas", "   "), None);
    }

    #[test]
    fn unknown_game_returns_none() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);
        assert_eq!(registry.lookup("NotAGame", "1.0.0.14296"), None);
    }

    #[test]
    fn hex_parses_with_and_without_prefix() {
        assert_eq!(parse_hex_offset("500CD78").unwrap(), 0x500CD78);
        assert_eq!(parse_hex_offset("0x500CD78").unwrap(), 0x500CD78);
        assert_eq!(parse_hex_offset("0X500cd78").unwrap(), 0x500CD78);
        assert!(parse_hex_offset("zzz").is_err());
        assert!(parse_hex_offset("").is_err());
    }

    #[test]
    fn add_persists_and_strips_prefix() {
        let dir = TempDir::new().unwrap();
        let mut registry = registry_in(&dir);
        assert_eq!(
            registry.add("SanAndreas", "9.9.9.1", "0xDEAD10").unwrap(),
            AddOutcome::Added
        );

        let content = std::fs::read_to_string(dir.path().join(USER_OFFSETS_FILE)).unwrap();
        assert!(content.contains("DEAD10"));
        assert!(!content.contains("0xDEAD10"));

        // A fresh registry sees the persisted entry.
        let reopened = registry_in(&dir);
        assert_eq!(reopened.lookup("SanAndreas", "9.9.9.1"), Some(0xDEAD10));
    }

    #[test]
    fn add_rejects_duplicate_version() {
        let dir = TempDir::new().unwrap();
        let mut registry = registry_in(&dir);
        registry.add("ViceCity", "9.9.9.1", "100").unwrap();
        assert_eq!(
            registry.add("ViceCity", "9.9.9.1", "200").unwrap(),
            AddOutcome::AlreadyExists
        );
        // The original value survives.
        assert_eq!(registry.lookup("ViceCity", "9.9.9.1"), Some(0x100));
    }

    #[test]
    fn add_rejects_blank_fields_and_bad_hex() {
        let dir = TempDir::new().unwrap();
        let mut registry = registry_in(&dir);
        assert!(matches!(
            registry.add("", "1.0.0.1", "100").unwrap(),
            AddOutcome::Invalid(_)
        ));
        assert!(matches!(
            registry.add("ViceCity", "  ", "100").unwrap(),
            AddOutcome::Invalid(_)
        ));
        assert!(matches!(
            registry.add("ViceCity", "1.0.0.1", "not-hex").unwrap(),
            AddOutcome::Invalid(_)
        ));
    }

    #[test]
    fn add_reloads_before_writing() {
        let dir = TempDir::new().unwrap();
        let mut registry = registry_in(&dir);

        // External edit after the registry was opened.
        let mut other = registry_in(&dir);
        other.add("ViceCity", "8.8.8.8", "800").unwrap();

        registry.add("SanAndreas", "9.9.9.9", "900").unwrap();

        // Both entries survive in the file.
        let reopened = registry_in(&dir);
        assert_eq!(reopened.lookup("ViceCity", "8.8.8.8"), Some(0x800));
        assert_eq!(reopened.lookup("SanAndreas", "9.9.9.9"), Some(0x900));
    }

    #[test]
    fn hardcoded_table_wins_over_user_entry() {
        let dir = TempDir::new().unwrap();
        let mut registry = registry_in(&dir);
        registry.add("SanAndreas", "1.0.0.14296", "1234").unwrap();
        assert_eq!(
            registry.lookup("SanAndreas", "1.0.0.14296"),
            Some(0x500CD78)
        );
    }

    #[test]
    fn corrupt_user_file_degrades_to_empty_table() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(USER_OFFSETS_FILE), "{not json").unwrap();
        let registry = registry_in(&dir);
        assert_eq!(registry.lookup("SanAndreas", "1.0.0.14296"), Some(0x500CD78));
        assert!(registry.user_versions("SanAndreas").is_empty());
    }
}
