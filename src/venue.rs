//! Venue and variant registries.
//!
//! The header stores the venue as a 32-bit identifier. Older engine builds
//! wrote the identifier byte-swapped relative to newer ones, so the table
//! mixes two kinds of entries: legacy codes that are stored here already
//! passed through a 32-bit byte-order reversal (`u32::swap_bytes` at table
//! construction, so the reversal happens once, not per lookup), and current
//! codes used directly.
//!
//! One identifier is shared by two eras of the same physical venue: Terrace
//! was reworked on 2018-06-03 and kept its code. The lookup alone cannot
//! tell the eras apart, so [`resolve_venue`] rewrites `"Terrace"` to
//! `"Old Terrace"` for matches whose decoded start timestamp falls strictly
//! before the rework date. This is the only decode whose correctness
//! depends on another decoded field.

use chrono::{DateTime, Utc};

/// Label returned for venue codes absent from the registry.
pub const UNKNOWN_VENUE: &str = "Unknown Venue";

/// First instant (2018-06-03T00:00:00Z) of the reworked Terrace.
///
/// Matches on the shared Terrace code that started strictly before this
/// belong to the pre-rework "Old Terrace" map.
const TERRACE_RENAME_EPOCH: i64 = 1_527_984_000;

/// Venue identifier table: `(code, name)` pairs.
///
/// Legacy codes (from builds that wrote the identifier byte-swapped) are
/// written as `0x...u32.swap_bytes()`; current codes are used directly.
const VENUES: &[(u32, &str)] = &[
    // Legacy codes, byte-swapped once at table construction
    (0x26C3_303Au32.swap_bytes(), "High-rise"),
    (0xAAFA_9659u32.swap_bytes(), "Ballroom"),
    (0x2519_125Bu32.swap_bytes(), "Ballroom"),
    (0xA1C5_561Au32.swap_bytes(), "High-rise"),
    (0x5EAA_B328u32.swap_bytes(), "Old Gallery"),
    (0x750C_0A29u32.swap_bytes(), "Old Courtyard 2"),
    (0x83F5_9536u32.swap_bytes(), "Panopticon"),
    (0x91A0_BEA8u32.swap_bytes(), "Old Veranda"),
    (0xBC1F_89B8u32.swap_bytes(), "Old Balcony"),
    (0x4073_020Du32.swap_bytes(), "Pub"),
    (0xF3FF_853Bu32.swap_bytes(), "Pub"),
    (0xB0E7_C209u32.swap_bytes(), "Old Ballroom"),
    (0x6B68_CFB4u32.swap_bytes(), "Old Courtyard"),
    (0x8FE3_7670u32.swap_bytes(), "Double Modern"),
    (0x2061_14E6u32.swap_bytes(), "Modern"),
    // Current codes
    (0x6F81_A558, "Veranda"),
    (0x9DC5_BB5E, "Courtyard"),
    (0x168F_4F62, "Library"),
    (0x1DBD_8E41, "Balcony"),
    (0x7173_B8BF, "Gallery"),
    (0x9032_CE22, "Terrace"),
    (0x2E37_F15B, "Moderne"),
    (0x79DF_A0CF, "Teien"),
    (0x98E4_5D99, "Aquarium"),
    (0x35AC_5135, "Redwoods"),
    (0xF3E6_1461, "Modern"),
];

/// Ordered variant names for Teien, indexed by the header's variant field.
const TEIEN_VARIANTS: [&str; 8] = [
    "BooksBooksBooks",
    "BooksStatuesBooks",
    "StatuesBooksBooks",
    "StatuesStatuesBooks",
    "BooksBooksStatues",
    "BooksStatuesStatues",
    "StatuesBooksStatues",
    "StatuesStatuesStatues",
];

/// Ordered variant names for Aquarium.
const AQUARIUM_VARIANTS: [&str; 2] = ["Bottom", "Top"];

/// Looks up a raw 32-bit venue code in the registry.
///
/// Returns `None` for codes absent from the table.
///
/// # Example
///
/// ```
/// use spyparty_parser::venue::venue_name;
///
/// assert_eq!(venue_name(0x9032_CE22), Some("Terrace"));
/// assert_eq!(venue_name(0xDEAD_BEEF), None);
/// ```
#[must_use]
pub fn venue_name(code: u32) -> Option<&'static str> {
    VENUES
        .iter()
        .find(|&&(venue_code, _)| venue_code == code)
        .map(|&(_, name)| name)
}

/// Resolves a raw venue code to its final display name.
///
/// Unknown codes yield the [`UNKNOWN_VENUE`] label rather than an error: a
/// best-effort record beats an aborted decode. For the shared Terrace code,
/// matches started strictly before the 2018-06-03 rework resolve to
/// `"Old Terrace"`; the boundary instant itself resolves to `"Terrace"`.
///
/// Callers must pass the match's decoded start timestamp, so timestamp
/// decoding has to complete before venue resolution.
#[must_use]
pub fn resolve_venue(code: u32, started_at: DateTime<Utc>) -> String {
    let name = venue_name(code).unwrap_or(UNKNOWN_VENUE);

    if name == "Terrace" && started_at.timestamp() < TERRACE_RENAME_EPOCH {
        return "Old Terrace".to_string();
    }

    name.to_string()
}

/// Looks up a venue-variant name by venue and variant index.
///
/// Only Teien and Aquarium have play-style variants. An out-of-range index
/// or a venue with no variant list yields `None`, never an error.
///
/// # Example
///
/// ```
/// use spyparty_parser::venue::variant_name;
///
/// assert_eq!(variant_name("Aquarium", 1), Some("Top"));
/// assert_eq!(variant_name("Aquarium", 2), None);
/// assert_eq!(variant_name("Ballroom", 0), None);
/// ```
#[must_use]
pub fn variant_name(venue: &str, index: u32) -> Option<&'static str> {
    let variants: &[&str] = match venue {
        "Teien" => &TEIEN_VARIANTS,
        "Aquarium" => &AQUARIUM_VARIANTS,
        _ => return None,
    };

    variants.get(index as usize).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Timestamp helper for disambiguation tests.
    fn utc(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    // 2018-05-01T00:00:00Z and 2018-07-01T00:00:00Z
    const MAY_2018: i64 = 1_525_132_800;
    const JULY_2018: i64 = 1_530_403_200;

    #[test]
    fn test_current_code_lookup() {
        assert_eq!(venue_name(0x9DC5_BB5E), Some("Courtyard"));
        assert_eq!(venue_name(0x79DF_A0CF), Some("Teien"));
        assert_eq!(venue_name(0x35AC_5135), Some("Redwoods"));
    }

    #[test]
    fn test_legacy_code_lookup_is_byte_swapped() {
        // 0x26C3303A is the legacy on-disk spelling of High-rise; the file
        // field reads back as its byte-swapped value.
        assert_eq!(venue_name(0x3A30_C326), Some("High-rise"));
        assert_eq!(venue_name(0x26C3_303A), None);

        assert_eq!(venue_name(0xAAFA_9659u32.swap_bytes()), Some("Ballroom"));
        assert_eq!(venue_name(0xB0E7_C209u32.swap_bytes()), Some("Old Ballroom"));
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(venue_name(0xDEAD_BEEF), None);
        assert_eq!(resolve_venue(0xDEAD_BEEF, utc(JULY_2018)), UNKNOWN_VENUE);
    }

    #[test]
    fn test_terrace_before_rework() {
        let venue = resolve_venue(0x9032_CE22, utc(MAY_2018));
        assert_eq!(venue, "Old Terrace");
    }

    #[test]
    fn test_terrace_after_rework() {
        let venue = resolve_venue(0x9032_CE22, utc(JULY_2018));
        assert_eq!(venue, "Terrace");
    }

    #[test]
    fn test_terrace_boundary_instant() {
        // Strictly-before comparison: the rework instant itself is new
        // Terrace, one second earlier is old.
        assert_eq!(
            resolve_venue(0x9032_CE22, utc(TERRACE_RENAME_EPOCH)),
            "Terrace"
        );
        assert_eq!(
            resolve_venue(0x9032_CE22, utc(TERRACE_RENAME_EPOCH - 1)),
            "Old Terrace"
        );
    }

    #[test]
    fn test_rename_applies_only_to_terrace() {
        // Other venues are unaffected by the date.
        assert_eq!(resolve_venue(0x9DC5_BB5E, utc(MAY_2018)), "Courtyard");
        // "Old" venues keep their names regardless of era.
        assert_eq!(
            resolve_venue(0x5EAA_B328u32.swap_bytes(), utc(JULY_2018)),
            "Old Gallery"
        );
    }

    #[test]
    fn test_teien_variants() {
        assert_eq!(variant_name("Teien", 0), Some("BooksBooksBooks"));
        assert_eq!(variant_name("Teien", 7), Some("StatuesStatuesStatues"));
        assert_eq!(variant_name("Teien", 8), None);
    }

    #[test]
    fn test_aquarium_variants() {
        assert_eq!(variant_name("Aquarium", 0), Some("Bottom"));
        assert_eq!(variant_name("Aquarium", 1), Some("Top"));
        assert_eq!(variant_name("Aquarium", 2), None);
    }

    #[test]
    fn test_variantless_venues() {
        assert_eq!(variant_name("Ballroom", 0), None);
        assert_eq!(variant_name("Terrace", 0), None);
        assert_eq!(variant_name(UNKNOWN_VENUE, 0), None);
    }
}
