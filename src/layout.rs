//! Per-version byte-offset tables for the replay header.
//!
//! The on-disk header layout drifted across five generations of the game
//! engine; format versions 3 through 6 are decodable. This module is the
//! one place that absorbs that drift: every field read performed by the
//! decoder goes through a [`VersionLayout`] looked up by the version number
//! at offset 0x04.
//!
//! Versions 3 and 4 lack display-name and guest/clock fields; versions 5
//! and 6 add them; only version 6 has a venue-variant field. Fields a
//! version does not carry are `None`, never a guessed offset.
//!
//! The full tables are documented in `FORMAT.md` alongside this library.
//!
//! # Example
//!
//! ```
//! use spyparty_parser::layout::VersionLayout;
//!
//! let layout = VersionLayout::for_version(6).unwrap();
//! assert_eq!(layout.uuid, 0x18);
//! assert_eq!(layout.variant, Some(0x44));
//!
//! assert!(VersionLayout::for_version(7).is_err());
//! ```

use crate::error::{ParserError, Result};

/// The file-format versions this parser can decode.
pub const SUPPORTED_VERSIONS: &[u32] = &[3, 4, 5, 6];

/// A fixed table of byte offsets for one replay file-format version.
///
/// Constructed once as a `const` and shared read-only by all decode calls.
/// Optional fields model "absent in this version", keeping that case
/// distinct from "present but zero".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionLayout {
    /// Offset of the 4-byte ASCII magic signature (always 0x00).
    pub magic: usize,

    /// Offset of the 4-byte file-format version (always 0x04).
    pub version: usize,

    /// Offset of the 4-byte protocol version.
    pub protocol_version: usize,

    /// Offset of the 4-byte game application version.
    pub app_version: usize,

    /// Offset of the match duration, a 4-byte float in seconds.
    pub duration: usize,

    /// Offset of the 16-byte replay identifier.
    pub uuid: usize,

    /// Offset of the 4-byte match start timestamp (epoch seconds).
    pub timestamp: usize,

    /// Offset of the 2-byte sequential play id.
    pub play_id: usize,

    /// Base offset of the variable-length name block.
    pub name_block: usize,

    /// Offset of the 1-byte spy login name length prefix.
    pub spy_login_len: usize,

    /// Offset of the 1-byte sniper login name length prefix.
    pub sniper_login_len: usize,

    /// Offset of the 1-byte spy display name length prefix, if this
    /// version carries display names.
    pub spy_display_len: Option<usize>,

    /// Offset of the 1-byte sniper display name length prefix, if this
    /// version carries display names.
    pub sniper_display_len: Option<usize>,

    /// Offset of the 4-byte guest-table count, if this version carries it.
    pub guests: Option<usize>,

    /// Offset of the 4-byte game clock setting, if this version carries it.
    pub clock: Option<usize>,

    /// Offset of the 4-byte match result code.
    pub result: usize,

    /// Offset of the packed 4-byte game-type setup word.
    pub game_type: usize,

    /// Offset of the 4-byte venue identifier.
    pub venue: usize,

    /// Offset of the 4-byte venue-variant index (version 6 only).
    pub variant: Option<usize>,

    /// Offset of the selected-missions bitmask.
    pub missions_selected: usize,

    /// Offset of the picked-missions bitmask (spy's personal choice).
    pub missions_picked: usize,

    /// Offset of the completed-missions bitmask.
    pub missions_completed: usize,
}

/// Version 3 layout, the oldest decodable generation.
const LAYOUT_V3: VersionLayout = VersionLayout {
    magic: 0x00,
    version: 0x04,
    protocol_version: 0x08,
    app_version: 0x0C,
    duration: 0x14,
    uuid: 0x18,
    timestamp: 0x28,
    play_id: 0x2C,
    name_block: 0x50,
    spy_login_len: 0x2E,
    sniper_login_len: 0x2F,
    spy_display_len: None,
    sniper_display_len: None,
    guests: None,
    clock: None,
    result: 0x30,
    game_type: 0x34,
    venue: 0x38,
    variant: None,
    missions_selected: 0x3C,
    missions_picked: 0x40,
    missions_completed: 0x44,
};

/// Version 4 layout: same fields as version 3, shifted for a wider header.
const LAYOUT_V4: VersionLayout = VersionLayout {
    name_block: 0x54,
    result: 0x34,
    game_type: 0x38,
    venue: 0x3C,
    missions_selected: 0x40,
    missions_picked: 0x44,
    missions_completed: 0x48,
    ..LAYOUT_V3
};

/// Version 5 layout: adds display names, guest count, and clock.
const LAYOUT_V5: VersionLayout = VersionLayout {
    name_block: 0x60,
    spy_display_len: Some(0x30),
    sniper_display_len: Some(0x31),
    guests: Some(0x50),
    clock: Some(0x54),
    result: 0x38,
    game_type: 0x3C,
    venue: 0x40,
    missions_selected: 0x44,
    missions_picked: 0x48,
    missions_completed: 0x4C,
    ..LAYOUT_V3
};

/// Version 6 layout: adds the venue-variant index.
const LAYOUT_V6: VersionLayout = VersionLayout {
    name_block: 0x64,
    guests: Some(0x54),
    clock: Some(0x58),
    variant: Some(0x44),
    missions_selected: 0x48,
    missions_picked: 0x4C,
    missions_completed: 0x50,
    ..LAYOUT_V5
};

impl VersionLayout {
    /// Returns the offset table for a file-format version.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnsupportedVersion` for any version outside
    /// 3–6. There is deliberately no default layout.
    ///
    /// # Example
    ///
    /// ```
    /// use spyparty_parser::layout::VersionLayout;
    ///
    /// assert!(VersionLayout::for_version(3).is_ok());
    /// assert!(VersionLayout::for_version(0).is_err());
    /// ```
    pub fn for_version(version: u32) -> Result<&'static VersionLayout> {
        match version {
            3 => Ok(&LAYOUT_V3),
            4 => Ok(&LAYOUT_V4),
            5 => Ok(&LAYOUT_V5),
            6 => Ok(&LAYOUT_V6),
            _ => Err(ParserError::UnsupportedVersion { version }),
        }
    }

    /// Returns whether this layout carries display-name fields.
    #[must_use]
    pub fn has_display_names(&self) -> bool {
        self.spy_display_len.is_some() && self.sniper_display_len.is_some()
    }
}
