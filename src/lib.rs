//! # SpyParty Parser
//!
//! A SpyParty replay (`.replay`) header parser library.
//!
//! This library decodes the binary replay header into a single structured
//! [`ReplayRecord`], robust to five generations of on-disk layout drift
//! (decodable file-format versions 3 through 6), and filters collections
//! of decoded records with caller-supplied criteria.
//!
//! ## Quick Start
//!
//! ```no_run
//! use spyparty_parser::ReplayRecord;
//!
//! let data = std::fs::read("match.replay").unwrap();
//!
//! // Soft decoding: anything that is not a valid replay yields None
//! if let Some(record) = ReplayRecord::decode(&data, "match.replay") {
//!     println!("{} vs {}", record.spy_display_name, record.sniper_display_name);
//!     println!("{} on {} ({})", record.result, record.venue, record.game_type);
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`error`] - Error types and result alias for parser operations
//! - [`binary`] - Low-level binary reading utilities for little-endian data
//! - [`layout`] - Per-version byte-offset tables (the format-drift absorber)
//! - [`names`] - Variable-length player name block extraction
//! - [`mission`] - Mission bitmask decoding
//! - [`game_type`] - Packed game-type setup word decoding
//! - [`venue`] - Venue/variant registries and the Terrace era rule
//! - [`record`] - The decoded record and the decoding orchestrator
//! - [`filter`] - Conjunctive criteria filtering over decoded records
//!
//! ## Format Reference
//!
//! The replay format documentation is maintained in `FORMAT.md` alongside
//! this library. Key characteristics:
//!
//! - 4-byte ASCII magic `RPLY` at offset 0
//! - 4-byte file-format version at offset 0x04, selecting the offset table
//! - Minimum file size of 416 bytes
//!
//! All multi-byte values are stored in little-endian byte order.
//!
//! ## Decoding model
//!
//! Decoding one buffer is a pure, synchronous computation over immutable
//! `const` tables: no locks, no shared mutable state, safe to run for many
//! files concurrently. A decode either completes or fails one of the
//! validation gates; malformed input is reported as an absent result,
//! never a panic.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod binary;
pub mod error;
pub mod filter;
pub mod game_type;
pub mod layout;
pub mod mission;
pub mod names;
pub mod record;
pub mod venue;

// Re-export commonly used types at the crate root
pub use error::{ParserError, Result};
pub use filter::{CriteriaFilter, Criterion};
pub use game_type::{GameMode, GameType};
pub use layout::{VersionLayout, SUPPORTED_VERSIONS};
pub use mission::{decode_missions, Mission};
pub use names::PlayerNames;
pub use record::{ReplayRecord, ReplayResult, MIN_REPLAY_SIZE, REPLAY_MAGIC};
pub use venue::{resolve_venue, variant_name, venue_name, UNKNOWN_VENUE};
