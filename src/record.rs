//! The decoded replay record and its decoder.
//!
//! [`ReplayRecord::parse`] is the orchestrator: it runs the three
//! validation gates (minimum size, magic bytes, known version), resolves
//! the version's offset layout, and assembles the record from the value
//! decoders. Decoding either fully succeeds or yields no record — a
//! partially filled record is never produced, and no input can make the
//! decoder panic.
//!
//! Batch callers scanning many files use [`ReplayRecord::decode`], which
//! collapses every fault into `None` so one garbage file never stops the
//! scan.
//!
//! # Example
//!
//! ```no_run
//! use spyparty_parser::ReplayRecord;
//!
//! let data = std::fs::read("match.replay").unwrap();
//! if let Some(record) = ReplayRecord::decode(&data, "match.replay") {
//!     println!("{} vs {} at {}", record.spy_display_name,
//!              record.sniper_display_name, record.venue);
//! }
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use chrono::{DateTime, Utc};

use crate::binary::{read_bytes, read_f32_le, read_u16_le, read_u32_le};
use crate::error::{ParserError, Result};
use crate::game_type::{GameMode, GameType};
use crate::layout::VersionLayout;
use crate::mission::{read_missions, Mission};
use crate::names::PlayerNames;
use crate::venue::{resolve_venue, variant_name};

/// The 4-byte ASCII signature at offset 0 of every replay file.
pub const REPLAY_MAGIC: &[u8; 4] = b"RPLY";

/// Minimum byte length of a valid replay file.
///
/// Anything shorter cannot contain a complete header for any supported
/// version.
pub const MIN_REPLAY_SIZE: usize = 416;

/// Byte length of the raw replay identifier.
const UUID_LEN: usize = 16;

/// The outcome of a match, from the header's 4-byte result code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplayResult {
    /// The spy completed the required missions (code 0).
    MissionsWin,
    /// The game clock ran out (code 1).
    TimeOut,
    /// The sniper shot the spy (code 2).
    SpyShot,
    /// The sniper shot a civilian (code 3).
    CivilianShot,
    /// The match was still running when the replay was written (code 4).
    InProgress,
}

impl ReplayResult {
    /// Decodes a result from its header code.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::InvalidHeader` for codes outside the fixed
    /// 5-entry table.
    pub fn from_code(code: u32) -> Result<Self> {
        match code {
            0 => Ok(ReplayResult::MissionsWin),
            1 => Ok(ReplayResult::TimeOut),
            2 => Ok(ReplayResult::SpyShot),
            3 => Ok(ReplayResult::CivilianShot),
            4 => Ok(ReplayResult::InProgress),
            _ => Err(ParserError::InvalidHeader {
                reason: format!("Unknown result code: {code}"),
            }),
        }
    }

    /// Returns the result's display label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ReplayResult::MissionsWin => "Missions Win",
            ReplayResult::TimeOut => "Time Out",
            ReplayResult::SpyShot => "Spy Shot",
            ReplayResult::CivilianShot => "Civilian Shot",
            ReplayResult::InProgress => "In Progress",
        }
    }

    /// Returns whether the spy won the match.
    #[must_use]
    pub const fn is_spy_win(self) -> bool {
        matches!(self, ReplayResult::MissionsWin | ReplayResult::CivilianShot)
    }

    /// Returns whether the sniper won the match.
    #[must_use]
    pub const fn is_sniper_win(self) -> bool {
        matches!(self, ReplayResult::TimeOut | ReplayResult::SpyShot)
    }
}

impl fmt::Display for ReplayResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully decoded replay record.
///
/// Constructed exactly once per successfully parsed file and immutable
/// thereafter. Optional fields are `None` when the file's format version
/// does not carry them ("absent" stays distinct from "present but zero").
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayRecord {
    /// The 16-byte replay identifier, URL-safe base64 encoded with the
    /// trailing padding removed (22 characters).
    pub uuid: String,

    /// Short sequential play identifier.
    pub play_id: u16,

    /// Match start timestamp.
    pub started_at: DateTime<Utc>,

    /// Spy's presentation name.
    pub spy_display_name: String,

    /// Sniper's presentation name.
    pub sniper_display_name: String,

    /// Spy's account login name.
    pub spy_login: String,

    /// Sniper's account login name.
    pub sniper_login: String,

    /// Match outcome.
    pub result: ReplayResult,

    /// Venue name, with the Terrace era disambiguated by timestamp.
    pub venue: String,

    /// Venue-variant name, for the two venues that have variants
    /// (version 6 files only).
    pub variant: Option<String>,

    /// Decoded game-type descriptor.
    pub game_type: GameType,

    /// Guest-table count (versions 5+).
    pub guests: Option<u32>,

    /// Game clock setting in seconds (versions 5+).
    pub clock: Option<u32>,

    /// Match duration in whole seconds.
    pub duration_secs: u32,

    /// Missions selected for the match.
    pub selected_missions: BTreeSet<Mission>,

    /// Missions offered to the spy for personal choice. Only meaningful
    /// in pick mode; `None` otherwise.
    pub picked_missions: Option<BTreeSet<Mission>>,

    /// Missions the spy completed.
    pub completed_missions: BTreeSet<Mission>,

    /// Path of the source replay file.
    pub source_path: PathBuf,
}

impl ReplayRecord {
    /// Parses a replay record from a fully buffered file.
    ///
    /// Validation gates run in order — minimum size, magic bytes, known
    /// version — then the header fields are assembled through the
    /// version's offset layout. Every read is bounds-checked, so a corrupt
    /// offset surfaces as an error, never a panic.
    ///
    /// # Arguments
    ///
    /// * `data` - The entire contents of one `.replay` file
    /// * `source` - The file's path, recorded on the result
    ///
    /// # Errors
    ///
    /// - `ParserError::FileTooSmall` if the buffer is under 416 bytes
    /// - `ParserError::InvalidMagic` if the signature is not `RPLY`
    /// - `ParserError::UnsupportedVersion` for versions outside 3–6
    /// - `ParserError::UnexpectedEof` if an offset read is out of bounds
    /// - `ParserError::InvalidHeader` for malformed names or enum codes
    pub fn parse(data: &[u8], source: impl Into<PathBuf>) -> Result<Self> {
        // Gate 1: minimum size
        if data.len() < MIN_REPLAY_SIZE {
            return Err(ParserError::FileTooSmall {
                minimum: MIN_REPLAY_SIZE,
                actual: data.len(),
            });
        }

        // Gate 2: magic bytes
        let magic = read_bytes(data, 0, REPLAY_MAGIC.len())?;
        if magic != REPLAY_MAGIC {
            return Err(ParserError::invalid_magic(REPLAY_MAGIC, magic));
        }

        // Gate 3: known version
        let version = read_u32_le(data, 0x04)?;
        let layout = VersionLayout::for_version(version)?;

        let names = PlayerNames::extract(data, layout)?;

        let timestamp = read_u32_le(data, layout.timestamp)?;
        let started_at = DateTime::from_timestamp(i64::from(timestamp), 0).ok_or_else(|| {
            ParserError::InvalidHeader {
                reason: format!("Timestamp out of range: {timestamp}"),
            }
        })?;

        // Venue resolution must follow timestamp decoding: the shared
        // Terrace code is disambiguated by match date.
        let venue = resolve_venue(read_u32_le(data, layout.venue)?, started_at);

        let variant = match layout.variant {
            Some(offset) => {
                variant_name(&venue, read_u32_le(data, offset)?).map(str::to_string)
            }
            None => None,
        };

        let result = ReplayResult::from_code(read_u32_le(data, layout.result)?)?;
        let game_type = GameType::decode(read_u32_le(data, layout.game_type)?)?;

        let guests = match layout.guests {
            Some(offset) => Some(read_u32_le(data, offset)?),
            None => None,
        };
        let clock = match layout.clock {
            Some(offset) => Some(read_u32_le(data, offset)?),
            None => None,
        };

        let duration_secs = whole_seconds(read_f32_le(data, layout.duration)?);

        let selected_missions = read_missions(data, layout.missions_selected)?;
        let picked = read_missions(data, layout.missions_picked)?;
        let completed_missions = read_missions(data, layout.missions_completed)?;

        // The picked bitmask is only meaningful when the spy actually got
        // to pick; stray bits in other modes are discarded.
        let picked_missions = (game_type.mode == GameMode::Pick).then_some(picked);

        let uuid = encode_uuid(read_bytes(data, layout.uuid, UUID_LEN)?);
        let play_id = read_u16_le(data, layout.play_id)?;

        Ok(ReplayRecord {
            uuid,
            play_id,
            started_at,
            spy_display_name: names.spy_display_name,
            sniper_display_name: names.sniper_display_name,
            spy_login: names.spy_login,
            sniper_login: names.sniper_login,
            result,
            venue,
            variant,
            game_type,
            guests,
            clock,
            duration_secs,
            selected_missions,
            picked_missions,
            completed_missions,
            source_path: source.into(),
        })
    }

    /// Decodes a replay record, collapsing every fault into `None`.
    ///
    /// This is the batch-scan entry point: a buffer that is not a valid
    /// replay is silently skippable, matching the error-handling contract
    /// that no single file ever aborts a scan of many.
    #[must_use]
    pub fn decode(data: &[u8], source: impl Into<PathBuf>) -> Option<Self> {
        Self::parse(data, source).ok()
    }
}

/// Truncates a duration float to whole seconds.
///
/// The `as` cast truncates toward zero and saturates, so garbage negative
/// or NaN values become 0 and the duration invariant (non-negative integer
/// seconds) holds for any input bytes.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_seconds(duration: f32) -> u32 {
    duration as u32
}

/// Encodes the 16-byte replay identifier.
///
/// URL-safe base64, truncated at the first `=` encountered. For 16 bytes
/// of input the encoding is 24 characters with two trailing pads, so the
/// result is always the leading 22 characters.
fn encode_uuid(bytes: &[u8]) -> String {
    let mut encoded = URL_SAFE.encode(bytes);
    if let Some(pad) = encoded.find('=') {
        encoded.truncate(pad);
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2018-07-01T00:00:00Z
    const JULY_2018: u32 = 1_530_403_200;
    // 2018-05-01T00:00:00Z
    const MAY_2018: u32 = 1_525_132_800;

    const VENUE_VERANDA: u32 = 0x6F81_A558;
    const VENUE_TERRACE: u32 = 0x9032_CE22;
    const VENUE_TEIEN: u32 = 0x79DF_A0CF;

    fn put_u32(data: &mut [u8], offset: usize, value: u32) {
        data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }

    /// Builds a minimal well-formed replay buffer for a format version.
    ///
    /// Spy "s/agentmay" vs sniper "s/canary" on Veranda, pick mode p3/4,
    /// spy shot after 185.7 seconds.
    fn build_replay(version: u32) -> Vec<u8> {
        let layout = VersionLayout::for_version(version).unwrap();
        let mut data = vec![0u8; MIN_REPLAY_SIZE];

        data[0..4].copy_from_slice(REPLAY_MAGIC);
        put_u32(&mut data, 0x04, version);
        data[layout.duration..layout.duration + 4]
            .copy_from_slice(&185.7_f32.to_le_bytes());
        for (i, byte) in (0u8..16).enumerate() {
            data[layout.uuid + i] = byte;
        }
        put_u32(&mut data, layout.timestamp, JULY_2018);
        data[layout.play_id..layout.play_id + 2].copy_from_slice(&42u16.to_le_bytes());
        put_u32(&mut data, layout.result, 2); // Spy Shot
        put_u32(&mut data, layout.game_type, (1 << 28) | (4 << 14) | 3); // p3/4
        put_u32(&mut data, layout.venue, VENUE_VERANDA);
        put_u32(&mut data, layout.missions_selected, 0x1F);
        put_u32(&mut data, layout.missions_picked, 0x07);
        put_u32(&mut data, layout.missions_completed, 0x03);
        if let Some(offset) = layout.guests {
            put_u32(&mut data, offset, 5);
        }
        if let Some(offset) = layout.clock {
            put_u32(&mut data, offset, 150);
        }

        let spy = "s/agentmay";
        let sniper = "s/canary";
        data[layout.spy_login_len] = u8::try_from(spy.len()).unwrap();
        data[layout.sniper_login_len] = u8::try_from(sniper.len()).unwrap();
        let mut cursor = layout.name_block;
        data[cursor..cursor + spy.len()].copy_from_slice(spy.as_bytes());
        cursor += spy.len();
        data[cursor..cursor + sniper.len()].copy_from_slice(sniper.as_bytes());
        // Display-name length prefixes stay zero: displays fall back to
        // the logins in versions that carry them.

        data
    }

    #[test]
    fn test_parse_all_supported_versions() {
        for version in [3, 4, 5, 6] {
            let data = build_replay(version);
            let record = ReplayRecord::parse(&data, "test.replay")
                .unwrap_or_else(|e| panic!("version {version}: {e}"));

            assert_eq!(record.play_id, 42);
            assert_eq!(record.spy_login, "s/agentmay");
            assert_eq!(record.sniper_login, "s/canary");
            assert_eq!(record.spy_display_name, "s/agentmay");
            assert_eq!(record.result, ReplayResult::SpyShot);
            assert_eq!(record.venue, "Veranda");
            assert_eq!(record.game_type.to_string(), "p3/4");
            assert_eq!(record.duration_secs, 185);
            assert_eq!(record.selected_missions.len(), 5);
            assert_eq!(record.completed_missions.len(), 2);
            assert_eq!(
                record.picked_missions.as_ref().map(BTreeSet::len),
                Some(3)
            );
            assert_eq!(record.source_path, PathBuf::from("test.replay"));
        }
    }

    #[test]
    fn test_version_dependent_fields() {
        for version in [3u32, 4] {
            let record = ReplayRecord::parse(&build_replay(version), "t.replay").unwrap();
            assert_eq!(record.guests, None, "v{version} has no guests field");
            assert_eq!(record.clock, None, "v{version} has no clock field");
            assert_eq!(record.variant, None);
        }
        for version in [5u32, 6] {
            let record = ReplayRecord::parse(&build_replay(version), "t.replay").unwrap();
            assert_eq!(record.guests, Some(5));
            assert_eq!(record.clock, Some(150));
        }
    }

    #[test]
    fn test_too_small_buffer() {
        for len in [0usize, 4, 100, MIN_REPLAY_SIZE - 1] {
            let data = vec![0u8; len];
            let result = ReplayRecord::parse(&data, "t.replay");
            assert!(
                matches!(result, Err(ParserError::FileTooSmall { actual, .. }) if actual == len),
                "length {len} should fail the size gate"
            );
            assert!(ReplayRecord::decode(&data, "t.replay").is_none());
        }
    }

    #[test]
    fn test_bad_magic() {
        let mut data = build_replay(6);
        data[0..4].copy_from_slice(b"NOPE");
        let result = ReplayRecord::parse(&data, "t.replay");
        assert!(matches!(result, Err(ParserError::InvalidMagic { .. })));
        assert!(ReplayRecord::decode(&data, "t.replay").is_none());
    }

    #[test]
    fn test_unknown_version() {
        for version in [0u32, 1, 2, 7, 1000] {
            let mut data = build_replay(6);
            put_u32(&mut data, 0x04, version);
            let result = ReplayRecord::parse(&data, "t.replay");
            assert!(
                matches!(result, Err(ParserError::UnsupportedVersion { version: v }) if v == version)
            );
        }
    }

    #[test]
    fn test_uuid_encoding() {
        let record = ReplayRecord::parse(&build_replay(6), "t.replay").unwrap();
        assert_eq!(record.uuid.len(), 22);
        assert!(!record.uuid.contains('='));
        // 0x00..0x0F in URL-safe base64
        assert_eq!(record.uuid, "AAECAwQFBgcICQoLDA0ODw");
    }

    #[test]
    fn test_picked_missions_discarded_outside_pick_mode() {
        let layout = VersionLayout::for_version(6).unwrap();
        let mut data = build_replay(6);
        // Known mode, but stray bits left in the picked bitmask
        put_u32(&mut data, layout.game_type, 3);
        let record = ReplayRecord::parse(&data, "t.replay").unwrap();
        assert_eq!(record.game_type.to_string(), "k3/3");
        assert_eq!(record.picked_missions, None);
    }

    #[test]
    fn test_terrace_era_disambiguation() {
        let layout = VersionLayout::for_version(6).unwrap();

        let mut data = build_replay(6);
        put_u32(&mut data, layout.venue, VENUE_TERRACE);
        put_u32(&mut data, layout.timestamp, MAY_2018);
        let record = ReplayRecord::parse(&data, "t.replay").unwrap();
        assert_eq!(record.venue, "Old Terrace");

        put_u32(&mut data, layout.timestamp, JULY_2018);
        let record = ReplayRecord::parse(&data, "t.replay").unwrap();
        assert_eq!(record.venue, "Terrace");
    }

    #[test]
    fn test_variant_decoding() {
        let layout = VersionLayout::for_version(6).unwrap();

        let mut data = build_replay(6);
        put_u32(&mut data, layout.venue, VENUE_TEIEN);
        put_u32(&mut data, layout.variant.unwrap(), 2);
        let record = ReplayRecord::parse(&data, "t.replay").unwrap();
        assert_eq!(record.variant.as_deref(), Some("StatuesBooksBooks"));

        // Out-of-range index is a soft gap, not a fault
        put_u32(&mut data, layout.variant.unwrap(), 8);
        let record = ReplayRecord::parse(&data, "t.replay").unwrap();
        assert_eq!(record.variant, None);

        // Variant-less venue ignores the index
        put_u32(&mut data, layout.venue, VENUE_VERANDA);
        put_u32(&mut data, layout.variant.unwrap(), 0);
        let record = ReplayRecord::parse(&data, "t.replay").unwrap();
        assert_eq!(record.variant, None);
    }

    #[test]
    fn test_unknown_venue_is_soft() {
        let layout = VersionLayout::for_version(6).unwrap();
        let mut data = build_replay(6);
        put_u32(&mut data, layout.venue, 0xDEAD_BEEF);
        let record = ReplayRecord::parse(&data, "t.replay").unwrap();
        assert_eq!(record.venue, crate::venue::UNKNOWN_VENUE);
    }

    #[test]
    fn test_bad_result_code_is_a_fault() {
        let layout = VersionLayout::for_version(6).unwrap();
        let mut data = build_replay(6);
        put_u32(&mut data, layout.result, 9);
        assert!(matches!(
            ReplayRecord::parse(&data, "t.replay"),
            Err(ParserError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn test_bad_mode_nibble_is_a_fault() {
        let layout = VersionLayout::for_version(6).unwrap();
        let mut data = build_replay(6);
        put_u32(&mut data, layout.game_type, 0xF000_0000);
        assert!(ReplayRecord::decode(&data, "t.replay").is_none());
    }

    #[test]
    fn test_truncated_name_block_is_a_fault() {
        let layout = VersionLayout::for_version(6).unwrap();
        let mut data = build_replay(6);
        // Name length runs past the end of the 416-byte buffer
        data[layout.spy_login_len] = 0xFF;
        assert!(matches!(
            ReplayRecord::parse(&data, "t.replay"),
            Err(ParserError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_whole_seconds() {
        assert_eq!(whole_seconds(185.7), 185);
        assert_eq!(whole_seconds(0.999), 0);
        assert_eq!(whole_seconds(0.0), 0);
        // Garbage saturates instead of panicking or going negative
        assert_eq!(whole_seconds(-12.5), 0);
        assert_eq!(whole_seconds(f32::NAN), 0);
    }

    #[test]
    fn test_encode_uuid_truncates_at_first_pad() {
        assert_eq!(encode_uuid(&[0u8; 16]), "AAAAAAAAAAAAAAAAAAAAAA");
        assert_eq!(encode_uuid(&[0xFF; 16]).len(), 22);
        // The truncate-at-first-pad rule, visible with non-16-byte input
        assert_eq!(encode_uuid(&[0u8; 4]), "AAAAAA");
    }

    #[test]
    fn test_result_codes() {
        assert_eq!(
            ReplayResult::from_code(0).unwrap(),
            ReplayResult::MissionsWin
        );
        assert_eq!(ReplayResult::from_code(4).unwrap(), ReplayResult::InProgress);
        assert!(ReplayResult::from_code(5).is_err());

        assert!(ReplayResult::MissionsWin.is_spy_win());
        assert!(ReplayResult::CivilianShot.is_spy_win());
        assert!(ReplayResult::SpyShot.is_sniper_win());
        assert!(ReplayResult::TimeOut.is_sniper_win());
        assert!(!ReplayResult::InProgress.is_spy_win());
        assert!(!ReplayResult::InProgress.is_sniper_win());
    }
}
