//! Betting engine for tracking No-Limit Texas Hold'em hands.
//!
//! The engine follows one hand around a 6- or 9-handed table: blinds and
//! antes, turn order, legal-action validation, pot and side-pot accounting,
//! and the final distribution of chips. It renders nothing and stores
//! nothing; every transition takes a [`Hand`] by reference and returns the
//! next snapshot, so a UI can hold on to any state it has already shown.
//!
//! ## State
//!
//! - [`Hand`] — The aggregate root for one hand in progress
//! - [`Seat`] — Stack, round stake, hand contribution and status per player
//! - [`Round`] — Append-only action log and bet level for one street
//! - [`SidePot`] — One eligibility-capped layer of the pot
//!
//! ## Vocabulary
//!
//! - [`Action`] — Fold, check, call, raise-to, all-in, and forced posts
//! - [`Position`] — Acting seat roles; [`Chair`] adds the visual dealer seat
//! - [`Street`] — Preflop, flop, turn, river
//! - [`Phase`] — Betting on a street, awaiting showdown verdicts, or complete
//!
//! ## Resolution and records
//!
//! - [`Verdict`] — Operator-recorded showdown result for a seat
//! - [`Showdown`] — Layer-by-layer chip distribution
//! - [`StoredHand`] — Serializable record handed to persistence
//! - [`History`] — Setup plus events; rebuilds any earlier snapshot
mod action;
mod card;
mod config;
mod error;
mod hand;
mod history;
mod playout;
mod position;
mod pots;
mod record;
mod round;
mod seat;
mod settlement;
mod showdown;
mod street;

pub use action::*;
pub use card::*;
pub use config::*;
pub use error::*;
pub use hand::*;
pub use history::*;
pub use playout::*;
pub use position::*;
pub use pots::*;
pub use record::*;
pub use round::*;
pub use seat::*;
pub use settlement::*;
pub use showdown::*;
pub use street::*;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Chip amounts. Signed so that net results can go negative.
pub type Chips = i64;
/// Milliseconds since the Unix epoch, stamped on every logged action.
pub type Millis = u64;
/// Sequential hand number within a session, supplied by the caller.
pub type Number = u64;

// ============================================================================
// TRAITS
// ============================================================================
/// Random instance generation for testing and benchmarking.
pub trait Arbitrary {
    /// Generate a uniformly random instance.
    fn random() -> Self;
}

// ============================================================================
// TABLE DEFAULTS
// ============================================================================
/// Starting stack used by generated setups.
pub const STACK: Chips = 200;
/// Big blind amount.
pub const B_BLIND: Chips = 2;
/// Small blind amount.
pub const S_BLIND: Chips = 1;
/// Environment variable naming a JSON [`Config`] file for the tracker.
pub const CONFIG_VAR: &str = "TRACKER_CONFIG";

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Wall-clock timestamp for action logs.
pub fn now() -> Millis {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as Millis)
        .unwrap_or_default()
}

/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "cli")]
pub fn log() -> anyhow::Result<()> {
    std::fs::create_dir_all("logs")?;
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", now() / 1000))?,
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file])?;
    Ok(())
}
