//! Packed game-type setup word decoding.
//!
//! The header stores the match configuration as a single packed 32-bit
//! integer:
//!
//! | Bits  | Mask         | Field |
//! |-------|--------------|-------|
//! | 28–31 | `0xF0000000` | Mode (0 = known, 1 = pick, 2 = any) |
//! | 14–27 | `0x0FFFC000` | Missions available |
//! | 0–13  | `0x00003FFF` | Missions required |
//!
//! The canonical text form is `<mode><required>/<available>`, e.g. `k4/4`
//! or `p3/5`. In known mode the stored available count is not meaningful
//! and is overridden to equal the required count: known-mode matches always
//! offer exactly the required missions.

use std::fmt;

use crate::error::{ParserError, Result};

/// Bitmask of the missions-available field (bits 14–27).
const AVAILABLE_MASK: u32 = 0x0FFF_C000;

/// Bitmask of the missions-required field (bits 0–13).
const REQUIRED_MASK: u32 = 0x0000_3FFF;

/// Number of bits to shift the available field down.
const AVAILABLE_SHIFT: u32 = 14;

/// Number of bits to shift the mode nibble down.
const MODE_SHIFT: u32 = 28;

/// The match mode encoded in the top 4 bits of the setup word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    /// Fixed mission list: the spy must complete exactly the required set.
    Known,
    /// The spy picks a personal subset from the offered missions.
    Pick,
    /// Unconstrained: any of the available missions count.
    Any,
}

impl GameMode {
    /// Decodes a mode from the top-nibble code.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::InvalidHeader` for codes outside the fixed
    /// 3-entry table.
    pub fn from_code(code: u32) -> Result<Self> {
        match code {
            0 => Ok(GameMode::Known),
            1 => Ok(GameMode::Pick),
            2 => Ok(GameMode::Any),
            _ => Err(ParserError::InvalidHeader {
                reason: format!("Unknown game mode code: {code}"),
            }),
        }
    }

    /// Returns the single-letter form used in the canonical descriptor.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            GameMode::Known => 'k',
            GameMode::Pick => 'p',
            GameMode::Any => 'a',
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A decoded game-type descriptor: mode plus required/available counts.
///
/// # Example
///
/// ```
/// use spyparty_parser::game_type::{GameMode, GameType};
///
/// let game_type = GameType::decode((1 << 28) | (5 << 14) | 3).unwrap();
/// assert_eq!(game_type.mode, GameMode::Pick);
/// assert_eq!(game_type.to_string(), "p3/5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameType {
    /// The match mode.
    pub mode: GameMode,
    /// Number of missions the spy must complete.
    pub required: u16,
    /// Number of missions available to the spy.
    pub available: u16,
}

impl GameType {
    /// Decodes the packed 32-bit setup word.
    ///
    /// In known mode the encoded available value is overridden to equal
    /// the required count before the descriptor is formed.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::InvalidHeader` if the mode nibble is outside
    /// the fixed table.
    #[allow(clippy::cast_possible_truncation)]
    pub fn decode(setup: u32) -> Result<Self> {
        let mode = GameMode::from_code(setup >> MODE_SHIFT)?;
        let required = (setup & REQUIRED_MASK) as u16;
        let available = if mode == GameMode::Known {
            required
        } else {
            ((setup & AVAILABLE_MASK) >> AVAILABLE_SHIFT) as u16
        };

        Ok(GameType {
            mode,
            required,
            available,
        })
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}/{}", self.mode, self.required, self.available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a setup word from mode, available, and required fields.
    fn setup(mode: u32, available: u32, required: u32) -> u32 {
        (mode << MODE_SHIFT) | (available << AVAILABLE_SHIFT) | required
    }

    #[test]
    fn test_decode_zero() {
        let game_type = GameType::decode(0x0000_0000).unwrap();
        assert_eq!(game_type.mode, GameMode::Known);
        assert_eq!(game_type.required, 0);
        assert_eq!(game_type.available, 0);
        assert_eq!(game_type.to_string(), "k0/0");
    }

    #[test]
    fn test_decode_pick() {
        let game_type = GameType::decode(setup(1, 5, 3)).unwrap();
        assert_eq!(game_type.mode, GameMode::Pick);
        assert_eq!(game_type.required, 3);
        assert_eq!(game_type.available, 5);
        assert_eq!(game_type.to_string(), "p3/5");
    }

    #[test]
    fn test_decode_any() {
        let game_type = GameType::decode(setup(2, 8, 4)).unwrap();
        assert_eq!(game_type.mode, GameMode::Any);
        assert_eq!(game_type.to_string(), "a4/8");
    }

    #[test]
    fn test_known_mode_overrides_available() {
        // Whatever the encoded available bits say, known mode always
        // reports required twice.
        let game_type = GameType::decode(setup(0, 9, 4)).unwrap();
        assert_eq!(game_type.available, 4);
        assert_eq!(game_type.to_string(), "k4/4");

        let game_type = GameType::decode(setup(0, 0x3FFF, 7)).unwrap();
        assert_eq!(game_type.to_string(), "k7/7");
    }

    #[test]
    fn test_invalid_mode_codes() {
        for mode in 3..=15 {
            let result = GameType::decode(setup(mode, 5, 3));
            assert!(
                matches!(result, Err(ParserError::InvalidHeader { .. })),
                "mode {mode} should be rejected"
            );
        }
    }

    #[test]
    fn test_field_boundaries() {
        // Max required (14 bits) with pick mode and max available.
        let game_type = GameType::decode(setup(1, 0x3FFF, 0x3FFF)).unwrap();
        assert_eq!(game_type.required, 0x3FFF);
        assert_eq!(game_type.available, 0x3FFF);
    }

    #[test]
    fn test_mode_letters() {
        assert_eq!(GameMode::Known.letter(), 'k');
        assert_eq!(GameMode::Pick.letter(), 'p');
        assert_eq!(GameMode::Any.letter(), 'a');
    }
}
