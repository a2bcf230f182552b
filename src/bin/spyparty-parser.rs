//! SpyParty replay (.replay) parser CLI
//!
//! A command-line interface for parsing, validating, and filtering replay
//! files.
//!
//! ## Commands
//!
//! - `info` - Display quick replay metadata
//! - `parse` - Parse a replay with output format options
//! - `validate` - Validate replay format (exit codes for scripting)
//! - `batch` - Decode and filter a directory of replays

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use spyparty_parser::binary::read_u32_le;
use spyparty_parser::{
    CriteriaFilter, GameMode, ParserError, ReplayRecord, ReplayResult, VersionLayout,
    MIN_REPLAY_SIZE, REPLAY_MAGIC,
};

/// SpyParty replay (.replay) parser
#[derive(Parser)]
#[command(name = "spyparty-parser")]
#[command(about = "SpyParty replay (.replay) parser", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display replay information
    Info {
        /// Path to the replay file
        file: PathBuf,
    },
    /// Parse a replay file
    Parse {
        /// Path to the replay file
        file: PathBuf,
        /// Output format: json, pretty
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },
    /// Validate replay format
    Validate {
        /// Path to the replay file
        file: PathBuf,
        /// Verbose error reporting
        #[arg(short, long)]
        verbose: bool,
    },
    /// Decode and filter multiple replay files
    Batch {
        /// Directory containing replay files (scanned recursively)
        directory: PathBuf,
        /// Output directory for JSON files
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Generate summary report
        #[arg(long)]
        summary: bool,
        /// Keep only replays on this venue
        #[arg(long)]
        venue: Option<String>,
        /// Keep only replays with this result
        #[arg(long)]
        result: Option<ResultFilter>,
        /// Keep only replays with this game mode
        #[arg(long)]
        mode: Option<ModeFilter>,
        /// Keep only replays where this login played (either role)
        #[arg(long)]
        player: Option<String>,
    },
}

/// Output format options
#[derive(Clone, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

/// Match results accepted by `--result`.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum ResultFilter {
    MissionsWin,
    TimeOut,
    SpyShot,
    CivilianShot,
    InProgress,
}

impl From<ResultFilter> for ReplayResult {
    fn from(value: ResultFilter) -> Self {
        match value {
            ResultFilter::MissionsWin => ReplayResult::MissionsWin,
            ResultFilter::TimeOut => ReplayResult::TimeOut,
            ResultFilter::SpyShot => ReplayResult::SpyShot,
            ResultFilter::CivilianShot => ReplayResult::CivilianShot,
            ResultFilter::InProgress => ReplayResult::InProgress,
        }
    }
}

/// Game modes accepted by `--mode`.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeFilter {
    Known,
    Pick,
    Any,
}

impl From<ModeFilter> for GameMode {
    fn from(value: ModeFilter) -> Self {
        match value {
            ModeFilter::Known => GameMode::Known,
            ModeFilter::Pick => GameMode::Pick,
            ModeFilter::Any => GameMode::Any,
        }
    }
}

// ============================================================================
// Serializable Output Structures
// ============================================================================

#[derive(Serialize)]
struct RecordOutput {
    uuid: String,
    play_id: u16,
    started_at: DateTime<Utc>,
    spy: String,
    sniper: String,
    spy_login: String,
    sniper_login: String,
    result: String,
    venue: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    variant: Option<String>,
    game_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    guests: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    clock: Option<u32>,
    duration_secs: u32,
    selected_missions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    picked_missions: Option<Vec<String>>,
    completed_missions: Vec<String>,
    source_path: String,
}

impl From<&ReplayRecord> for RecordOutput {
    fn from(record: &ReplayRecord) -> Self {
        let mission_names =
            |missions: &std::collections::BTreeSet<spyparty_parser::Mission>| {
                missions.iter().map(ToString::to_string).collect::<Vec<_>>()
            };

        RecordOutput {
            uuid: record.uuid.clone(),
            play_id: record.play_id,
            started_at: record.started_at,
            spy: record.spy_display_name.clone(),
            sniper: record.sniper_display_name.clone(),
            spy_login: record.spy_login.clone(),
            sniper_login: record.sniper_login.clone(),
            result: record.result.to_string(),
            venue: record.venue.clone(),
            variant: record.variant.clone(),
            game_type: record.game_type.to_string(),
            guests: record.guests,
            clock: record.clock,
            duration_secs: record.duration_secs,
            selected_missions: mission_names(&record.selected_missions),
            picked_missions: record.picked_missions.as_ref().map(|m| mission_names(m)),
            completed_missions: mission_names(&record.completed_missions),
            source_path: record.source_path.display().to_string(),
        }
    }
}

#[derive(Serialize)]
struct BatchSummary {
    total_files: usize,
    decoded: usize,
    skipped: usize,
    matched: usize,
    venue_distribution: HashMap<String, usize>,
    result_distribution: HashMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    average_duration_secs: Option<u32>,
}

// ============================================================================
// Validation Result Structure
// ============================================================================

struct ValidationResult {
    size_valid: bool,
    magic_valid: bool,
    version_valid: bool,
    decode_valid: bool,
    errors: Vec<String>,
}

impl ValidationResult {
    fn is_valid(&self) -> bool {
        self.size_valid && self.magic_valid && self.version_valid && self.decode_valid
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Info { file } => cmd_info(&file),
        Commands::Parse { file, output } => cmd_parse(&file, &output),
        Commands::Validate { file, verbose } => cmd_validate(&file, verbose),
        Commands::Batch {
            directory,
            output,
            summary,
            venue,
            result,
            mode,
            player,
        } => cmd_batch(&directory, output, summary, venue, result, mode, player),
    }
}

// ============================================================================
// Info Command Implementation
// ============================================================================

fn cmd_info(file: &Path) -> ExitCode {
    let data = match std::fs::read(file) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let record = match ReplayRecord::parse(&data, file) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error parsing replay: {}", e);
            return ExitCode::FAILURE;
        }
    };

    print_info(&record, &data);

    ExitCode::SUCCESS
}

#[allow(clippy::cast_precision_loss)]
fn print_info(record: &ReplayRecord, data: &[u8]) {
    println!("=== Replay Information ===\n");

    println!("File:");
    println!(
        "  Size: {} bytes ({:.2} KB)",
        data.len(),
        data.len() as f64 / 1024.0
    );

    // These reads cannot fail once the record parsed from the same buffer.
    if let Ok(version) = read_u32_le(data, 0x04) {
        println!("  Format Version: {}", version);
        if let Ok(layout) = VersionLayout::for_version(version) {
            if let Ok(protocol) = read_u32_le(data, layout.protocol_version) {
                println!("  Protocol Version: 0x{:08X}", protocol);
            }
            if let Ok(app) = read_u32_le(data, layout.app_version) {
                println!("  Application Version: 0x{:08X}", app);
            }
        }
    }

    println!();

    println!("Match:");
    println!("  Play ID: {}", record.play_id);
    println!("  Started: {}", record.started_at.format("%Y-%m-%d %H:%M:%S"));
    println!(
        "  Spy: {} ({})",
        record.spy_display_name, record.spy_login
    );
    println!(
        "  Sniper: {} ({})",
        record.sniper_display_name, record.sniper_login
    );
    println!("  Result: {}", record.result);
    match &record.variant {
        Some(variant) => println!("  Venue: {} ({})", record.venue, variant),
        None => println!("  Venue: {}", record.venue),
    }
    println!("  Game Type: {}", record.game_type);
    println!("  Duration: {}s", record.duration_secs);
}

// ============================================================================
// Parse Command Implementation
// ============================================================================

fn cmd_parse(file: &Path, output: &OutputFormat) -> ExitCode {
    let data = match std::fs::read(file) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let record = match ReplayRecord::parse(&data, file) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let record_output = RecordOutput::from(&record);
    match output {
        OutputFormat::Json => print_json(&record_output),
        OutputFormat::Pretty => print_pretty(&record_output),
    }

    ExitCode::SUCCESS
}

fn print_json(output: &RecordOutput) {
    match serde_json::to_string_pretty(output) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing to JSON: {}", e),
    }
}

fn print_pretty(output: &RecordOutput) {
    println!("=== Replay ===");
    println!("UUID: {}", output.uuid);
    println!("Play ID: {}", output.play_id);
    println!("Started: {}", output.started_at.format("%Y-%m-%d %H:%M:%S"));
    println!("Spy: {} ({})", output.spy, output.spy_login);
    println!("Sniper: {} ({})", output.sniper, output.sniper_login);
    println!("Result: {}", output.result);
    match &output.variant {
        Some(variant) => println!("Venue: {} ({})", output.venue, variant),
        None => println!("Venue: {}", output.venue),
    }
    println!("Game Type: {}", output.game_type);
    if let Some(guests) = output.guests {
        println!("Guests: {}", guests);
    }
    if let Some(clock) = output.clock {
        println!("Clock: {}s", clock);
    }
    println!("Duration: {}s", output.duration_secs);
    println!("Selected Missions: {}", output.selected_missions.join(", "));
    if let Some(picked) = &output.picked_missions {
        println!("Picked Missions: {}", picked.join(", "));
    }
    println!(
        "Completed Missions: {}",
        output.completed_missions.join(", ")
    );
    println!("Source: {}", output.source_path);
}

// ============================================================================
// Validate Command Implementation
// ============================================================================

fn cmd_validate(file: &Path, verbose: bool) -> ExitCode {
    let result = validate_replay(file);

    if verbose {
        print_validation_details(&result, file);
    } else {
        print_validation_summary(&result, file);
    }

    if result.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn validate_replay(file: &Path) -> ValidationResult {
    let mut result = ValidationResult {
        size_valid: false,
        magic_valid: false,
        version_valid: false,
        decode_valid: false,
        errors: Vec::new(),
    };

    let data = match std::fs::read(file) {
        Ok(d) => d,
        Err(e) => {
            result.errors.push(format!("Failed to read file: {}", e));
            return result;
        }
    };

    // Gate 1: minimum size
    if data.len() < MIN_REPLAY_SIZE {
        result.errors.push(
            ParserError::FileTooSmall {
                minimum: MIN_REPLAY_SIZE,
                actual: data.len(),
            }
            .to_string(),
        );
        return result;
    }
    result.size_valid = true;

    // Gate 2: magic bytes
    if &data[..4] == REPLAY_MAGIC {
        result.magic_valid = true;
    } else {
        result
            .errors
            .push(ParserError::invalid_magic(REPLAY_MAGIC, &data[..4]).to_string());
        return result;
    }

    // Gate 3: known version
    match read_u32_le(&data, 0x04).map(VersionLayout::for_version) {
        Ok(Ok(_)) => result.version_valid = true,
        Ok(Err(e)) | Err(e) => {
            result.errors.push(e.to_string());
            return result;
        }
    }

    // Full decode
    match ReplayRecord::parse(&data, file) {
        Ok(_) => result.decode_valid = true,
        Err(e) => result.errors.push(format!("Decoding failed: {}", e)),
    }

    result
}

fn print_validation_summary(result: &ValidationResult, file: &Path) {
    let status = if result.is_valid() { "VALID" } else { "INVALID" };
    println!("{}: {}", file.display(), status);
}

fn print_validation_details(result: &ValidationResult, file: &Path) {
    println!("Validating: {}\n", file.display());

    println!("Checks:");
    println!("  Minimum size:      {}", status_icon(result.size_valid));
    println!("  Magic bytes:       {}", status_icon(result.magic_valid));
    println!("  Known version:     {}", status_icon(result.version_valid));
    println!("  Full decode:       {}", status_icon(result.decode_valid));

    if !result.errors.is_empty() {
        println!("\nErrors:");
        for error in &result.errors {
            println!("  - {}", error);
        }
    }

    println!(
        "\nResult: {}",
        if result.is_valid() { "VALID" } else { "INVALID" }
    );
}

fn status_icon(valid: bool) -> &'static str {
    if valid {
        "[OK]"
    } else {
        "[FAIL]"
    }
}

// ============================================================================
// Batch Command Implementation
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn cmd_batch(
    directory: &Path,
    output_dir: Option<PathBuf>,
    summary: bool,
    venue: Option<String>,
    result: Option<ResultFilter>,
    mode: Option<ModeFilter>,
    player: Option<String>,
) -> ExitCode {
    let replays = find_replays(directory);

    if replays.is_empty() {
        eprintln!("No .replay files found in {}", directory.display());
        return ExitCode::FAILURE;
    }

    eprintln!("Found {} replay files", replays.len());

    if let Some(ref dir) = output_dir {
        if !dir.exists() {
            if let Err(e) = std::fs::create_dir_all(dir) {
                eprintln!("Failed to create output directory: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    // Decode everything; structural faults are skippable, not fatal.
    let mut decoded = Vec::new();
    let mut skipped = 0usize;
    for path in &replays {
        let data = match std::fs::read(path) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("Skipping {}: {}", path.display(), e);
                skipped += 1;
                continue;
            }
        };
        match ReplayRecord::decode(&data, path) {
            Some(record) => decoded.push(record),
            None => skipped += 1,
        }
    }

    let decoded_count = decoded.len();
    eprintln!("Decoded {} replays ({} skipped)", decoded_count, skipped);

    let filter = build_filter(venue, result, mode, player);
    let matched = if filter.is_empty() {
        decoded
    } else {
        filter.apply(decoded)
    };

    for record in &matched {
        println!(
            "{} | {} | {} vs {} | {} | {} | {}s",
            record.started_at.format("%Y-%m-%d %H:%M"),
            record.venue,
            record.spy_display_name,
            record.sniper_display_name,
            record.game_type,
            record.result,
            record.duration_secs
        );
    }

    if let Some(ref dir) = output_dir {
        for record in &matched {
            if let Err(e) = write_record_json(dir, record) {
                eprintln!("Failed to write output: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    if summary {
        print_summary(
            replays.len(),
            decoded_count,
            skipped,
            &matched,
            output_dir.as_deref(),
        );
    }

    ExitCode::SUCCESS
}

/// Recursively collects `*.replay` files under a directory.
///
/// Directories whose path contains `"__"` are skipped: the game keeps
/// practice and tutorial replays under such folders.
fn find_replays(directory: &Path) -> Vec<PathBuf> {
    let mut replays = Vec::new();
    collect_replays(directory, &mut replays);
    replays.sort();
    replays
}

fn collect_replays(dir: &Path, replays: &mut Vec<PathBuf>) {
    if dir.to_string_lossy().contains("__") {
        return;
    }

    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                collect_replays(&path, replays);
            } else if path.extension().is_some_and(|e| e == "replay") {
                replays.push(path);
            }
        }
    }
}

fn build_filter(
    venue: Option<String>,
    result: Option<ResultFilter>,
    mode: Option<ModeFilter>,
    player: Option<String>,
) -> CriteriaFilter {
    let mut filter = CriteriaFilter::new();

    if let Some(venue) = venue {
        filter.push(move |record: &ReplayRecord| record.venue.eq_ignore_ascii_case(&venue));
    }
    if let Some(result) = result {
        let wanted = ReplayResult::from(result);
        filter.push(move |record: &ReplayRecord| record.result == wanted);
    }
    if let Some(mode) = mode {
        let wanted = GameMode::from(mode);
        filter.push(move |record: &ReplayRecord| record.game_type.mode == wanted);
    }
    if let Some(player) = player {
        filter.push(move |record: &ReplayRecord| {
            record.spy_login.eq_ignore_ascii_case(&player)
                || record.sniper_login.eq_ignore_ascii_case(&player)
        });
    }

    filter
}

fn write_record_json(dir: &Path, record: &ReplayRecord) -> std::io::Result<()> {
    let output_file = dir
        .join(record.source_path.file_stem().unwrap_or_default())
        .with_extension("json");

    let output = RecordOutput::from(record);
    let content = serde_json::to_string_pretty(&output)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    std::fs::write(&output_file, content)
}

fn print_summary(
    total_files: usize,
    decoded: usize,
    skipped: usize,
    matched: &[ReplayRecord],
    output_dir: Option<&Path>,
) {
    let mut venue_distribution: HashMap<String, usize> = HashMap::new();
    let mut result_distribution: HashMap<String, usize> = HashMap::new();
    let mut total_duration: u64 = 0;

    for record in matched {
        *venue_distribution.entry(record.venue.clone()).or_insert(0) += 1;
        *result_distribution
            .entry(record.result.to_string())
            .or_insert(0) += 1;
        total_duration += u64::from(record.duration_secs);
    }

    #[allow(clippy::cast_possible_truncation)]
    let average_duration_secs = if matched.is_empty() {
        None
    } else {
        Some((total_duration / matched.len() as u64) as u32)
    };

    let summary = BatchSummary {
        total_files,
        decoded,
        skipped,
        matched: matched.len(),
        venue_distribution,
        result_distribution,
        average_duration_secs,
    };

    println!("\n=== Batch Summary ===");
    println!("Files found: {}", summary.total_files);
    println!("Decoded: {}", summary.decoded);
    println!("Skipped (not valid replays): {}", summary.skipped);
    println!("Matched filter: {}", summary.matched);

    println!("\nVenue distribution:");
    let mut venues: Vec<_> = summary.venue_distribution.iter().collect();
    venues.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (venue, count) in venues {
        println!("  {}: {}", venue, count);
    }

    println!("\nResult distribution:");
    let mut results: Vec<_> = summary.result_distribution.iter().collect();
    results.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (result, count) in results {
        println!("  {}: {}", result, count);
    }

    if let Some(avg) = summary.average_duration_secs {
        println!("\nAverage duration: {:02}:{:02}", avg / 60, avg % 60);
    }

    if let Some(dir) = output_dir {
        let summary_file = dir.join("summary.json");
        if let Ok(json) = serde_json::to_string_pretty(&summary) {
            if std::fs::write(&summary_file, json).is_ok() {
                println!("\nSummary written to: {}", summary_file.display());
            }
        }
    }
}
