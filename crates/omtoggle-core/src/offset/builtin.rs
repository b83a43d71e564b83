//! Compiled-in offset table.
//!
//! Offsets are relative to the main module base and point at the one-byte
//! `on_mission` flag. Versions are the full four-part file version of the
//! executable.

/// game → (file version, hex offset from module base)
pub const BUILTIN_OFFSETS: &[(&str, &[(&str, &str)])] = &[
    (
        "SanAndreas",
        &[
            ("1.0.0.14296", "500CD78"),   // base release
            ("1.0.0.14388", "5010878"),   // title update 1.01
            ("1.0.0.14718", "501CB78"),   // title update 1.03
            ("1.0.0.15483", "501E838"),   // title update 1.04
            ("1.0.8.11827", "5095E08"),   // title update 1.04.5
            ("1.0.17.38838", "513003C"),  // Steam release
            ("1.0.17.39540", "5137698"),  // Epic release
            ("1.0.112.6680", "51BE148"),  // title update 1.112
            ("1.0.113.21181", "51BF148"), // Steam-only 1.113 update
        ],
    ),
    (
        "ViceCity",
        &[
            ("1.0.0.14296", "0x4E68394"),
            ("1.0.0.14388", "0x4E6F794"),
            ("1.0.0.14718", "0x4E74B14"),
            ("1.0.0.15399", "0x4E61E74"),
            ("1.0.8.11827", "0x4EE5D14"),
            ("1.0.17.38838", "0x4F78B34"),
            ("1.0.17.39540", "0x4F79B34"),
            ("1.0.112.6680", "0x5048488"),
            ("1.0.113.21181", "0x5048488"),
        ],
    ),
    (
        "LibertyCity",
        &[
            ("1.0.0.14296", "0x4E19888"),
            ("1.0.0.14377", "0x4E1D088"), // 1.01 shipped on a different build than the other two titles
            ("1.0.0.14718", "0x4E33408"),
            ("1.0.0.15284", "0x4D4C4B8"),
            ("1.0.8.11827", "0x4DC37B8"),
            ("1.0.17.38838", "0x4F11248"),
            ("1.0.17.39540", "0x4F15248"),
            ("1.0.112.6680", "0x4FD07BC"),
            ("1.0.113.21181", "0x4FD07BC"),
        ],
    ),
];

/// Versions (and raw hex values) known for a game in the compiled-in table.
pub fn builtin_versions(game: &str) -> &'static [(&'static str, &'static str)] {
    BUILTIN_OFFSETS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(game))
        .map(|(_, entries)| *entries)
        .unwrap_or(&[])
}
