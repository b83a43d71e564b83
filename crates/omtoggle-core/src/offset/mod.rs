//! Version→offset resolution.
//!
//! Two tables back the lookup: the compiled-in table shipped with the tool
//! and a user table persisted to `additional_addresses.json`. The hardcoded
//! table always wins; the user table extends it with versions added after
//! release.

mod builtin;
mod registry;

pub use builtin::{builtin_versions, BUILTIN_OFFSETS};
pub use registry::{parse_hex_offset, AddOutcome, OffsetRegistry, USER_OFFSETS_FILE};
