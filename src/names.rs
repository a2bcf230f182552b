//! Player name extraction from the variable-length name block.
//!
//! The fixed header is followed by a packed block of name bytes. Each
//! name's length lives in a one-byte prefix at a fixed offset, and the
//! bytes themselves are laid out back to back from the block's base
//! offset, in order: spy login, sniper login, then (versions 5+) spy
//! display name and sniper display name.
//!
//! Display names are optional overrides; when a stored display name is
//! empty, or when the version has no display-name fields at all, the
//! display name falls back to the corresponding login name.

use crate::binary::{read_u8, read_utf8};
use crate::error::Result;
use crate::layout::VersionLayout;

/// The four decoded player name strings.
///
/// Display names are never empty: an empty stored display name is replaced
/// by the login name during extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerNames {
    /// Spy's presentation name.
    pub spy_display_name: String,
    /// Sniper's presentation name.
    pub sniper_display_name: String,
    /// Spy's account login name as stored in the file.
    pub spy_login: String,
    /// Sniper's account login name as stored in the file.
    pub sniper_login: String,
}

impl PlayerNames {
    /// Extracts the player names from a replay buffer using the given
    /// version layout.
    ///
    /// A running cursor starts at the name-block base and advances past
    /// each decoded name. For layouts without display-name fields the
    /// display names equal the login names.
    ///
    /// # Errors
    ///
    /// - `ParserError::UnexpectedEof` if a length prefix or name bytes
    ///   fall outside the buffer
    /// - `ParserError::InvalidHeader` if name bytes are not valid UTF-8
    pub fn extract(data: &[u8], layout: &VersionLayout) -> Result<Self> {
        let mut cursor = layout.name_block;

        let spy_login_len = usize::from(read_u8(data, layout.spy_login_len)?);
        let spy_login = read_utf8(data, cursor, spy_login_len)?;
        cursor += spy_login_len;

        let sniper_login_len = usize::from(read_u8(data, layout.sniper_login_len)?);
        let sniper_login = read_utf8(data, cursor, sniper_login_len)?;

        let (spy_display_name, sniper_display_name) = match (
            layout.spy_display_len,
            layout.sniper_display_len,
        ) {
            (Some(spy_display_off), Some(sniper_display_off)) => {
                cursor += sniper_login_len;

                let spy_display_len = usize::from(read_u8(data, spy_display_off)?);
                let spy_display = read_utf8(data, cursor, spy_display_len)?;
                cursor += spy_display_len;

                let sniper_display_len = usize::from(read_u8(data, sniper_display_off)?);
                let sniper_display = read_utf8(data, cursor, sniper_display_len)?;

                // Empty display name means "no override"
                let spy_display = if spy_display.is_empty() {
                    spy_login.clone()
                } else {
                    spy_display
                };
                let sniper_display = if sniper_display.is_empty() {
                    sniper_login.clone()
                } else {
                    sniper_display
                };

                (spy_display, sniper_display)
            }
            _ => (spy_login.clone(), sniper_login.clone()),
        };

        Ok(PlayerNames {
            spy_display_name,
            sniper_display_name,
            spy_login,
            sniper_login,
        })
    }
}
