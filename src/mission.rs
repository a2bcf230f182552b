//! Mission bitmask decoding.
//!
//! The replay header stores three mission sets (selected, picked, and
//! completed) as 32-bit bitmasks. Each of the 8 missions is bound to one
//! bit position; a mission is in the set iff its bit is set. The same
//! decoder is used for all three fields.

use std::collections::BTreeSet;
use std::fmt;

use crate::binary::read_u32_le;
use crate::error::Result;

/// One of the 8 spy missions.
///
/// Each mission is bound to a fixed bit position (0–7) in the header's
/// mission bitmask fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mission {
    /// Bug the ambassador (bit 0).
    Bug,
    /// Contact the double agent (bit 1).
    Contact,
    /// Transfer the microfilm (bit 2).
    Transfer,
    /// Swap the statue (bit 3).
    Swap,
    /// Inspect the statues (bit 4).
    Inspect,
    /// Seduce the target (bit 5).
    Seduce,
    /// Purloin the guest list (bit 6).
    Purloin,
    /// Fingerprint the ambassador (bit 7).
    Fingerprint,
}

impl Mission {
    /// All missions in bit-position order.
    pub const ALL: [Mission; 8] = [
        Mission::Bug,
        Mission::Contact,
        Mission::Transfer,
        Mission::Swap,
        Mission::Inspect,
        Mission::Seduce,
        Mission::Purloin,
        Mission::Fingerprint,
    ];

    /// Returns the bit position bound to this mission.
    #[must_use]
    pub const fn bit(self) -> u32 {
        match self {
            Mission::Bug => 0,
            Mission::Contact => 1,
            Mission::Transfer => 2,
            Mission::Swap => 3,
            Mission::Inspect => 4,
            Mission::Seduce => 5,
            Mission::Purloin => 6,
            Mission::Fingerprint => 7,
        }
    }

    /// Returns the mission's display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Mission::Bug => "Bug",
            Mission::Contact => "Contact",
            Mission::Transfer => "Transfer",
            Mission::Swap => "Swap",
            Mission::Inspect => "Inspect",
            Mission::Seduce => "Seduce",
            Mission::Purloin => "Purloin",
            Mission::Fingerprint => "Fingerprint",
        }
    }
}

impl fmt::Display for Mission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decodes a 32-bit bitmask into the set of missions whose bits are set.
///
/// Only bits 0–7 are defined; higher bits are ignored. The result is
/// duplicate-free by construction.
///
/// # Example
///
/// ```
/// use spyparty_parser::mission::{decode_missions, Mission};
///
/// let set = decode_missions(0b0000_0101);
/// assert!(set.contains(&Mission::Bug));
/// assert!(set.contains(&Mission::Transfer));
/// assert_eq!(set.len(), 2);
/// ```
#[must_use]
pub fn decode_missions(mask: u32) -> BTreeSet<Mission> {
    Mission::ALL
        .into_iter()
        .filter(|mission| mask & (1 << mission.bit()) != 0)
        .collect()
}

/// Reads a 32-bit mission bitmask at the given offset and decodes it.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if the buffer doesn't contain a
/// full bitmask at the offset.
pub fn read_missions(bytes: &[u8], offset: usize) -> Result<BTreeSet<Mission>> {
    Ok(decode_missions(read_u32_le(bytes, offset)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_empty() {
        assert!(decode_missions(0x00).is_empty());
    }

    #[test]
    fn test_decode_all() {
        let set = decode_missions(0xFF);
        assert_eq!(set.len(), 8);
        for mission in Mission::ALL {
            assert!(set.contains(&mission));
        }
    }

    #[test]
    fn test_decode_single_bits() {
        // Bijection with the bit-test definition: each bit decodes to
        // exactly its bound mission.
        for mission in Mission::ALL {
            let set = decode_missions(1 << mission.bit());
            assert_eq!(set.len(), 1, "{mission} alone");
            assert!(set.contains(&mission));
        }
    }

    #[test]
    fn test_decode_membership_matches_bits() {
        for mask in [0x00u32, 0x01, 0x2A, 0x5D, 0x80, 0xF0, 0xFF] {
            let set = decode_missions(mask);
            for mission in Mission::ALL {
                assert_eq!(
                    set.contains(&mission),
                    mask & (1 << mission.bit()) != 0,
                    "mission {mission} in mask {mask:#04X}"
                );
            }
        }
    }

    #[test]
    fn test_high_bits_ignored() {
        assert!(decode_missions(0xFFFF_FF00).is_empty());
        assert_eq!(decode_missions(0xFFFF_FFFF).len(), 8);
    }

    #[test]
    fn test_read_missions() {
        let data = [0x00, 0x00, 0x05, 0x00, 0x00, 0x00];
        let set = read_missions(&data, 2).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Mission::Bug));
        assert!(set.contains(&Mission::Transfer));
    }

    #[test]
    fn test_read_missions_truncated() {
        let data = [0x05, 0x00];
        assert!(read_missions(&data, 0).is_err());
    }

    #[test]
    fn test_mission_names() {
        assert_eq!(Mission::Bug.to_string(), "Bug");
        assert_eq!(Mission::Fingerprint.to_string(), "Fingerprint");
    }
}
