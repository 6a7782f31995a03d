//! Shared constants.

/// Virtual-area prefixes that are never real storage slots:
/// temporary floor storage, receiving staging, order-picking staging.
pub const DEFAULT_VIRTUAL_PREFIXES: &[&str] = &["FLOOR", "REC", "ORD"];

/// Alternatives offered alongside the recommended slot.
pub const DEFAULT_MAX_ALTERNATIVES: usize = 3;

/// A part is ACTIVE while its last putaway is younger than this.
pub const ACTIVE_WINDOW_DAYS: i64 = 90;

/// Top-slot share above which a pattern is STRONG.
pub const STRONG_THRESHOLD_PCT: f64 = 50.0;

/// Top-slot share above which a pattern is MODERATE.
pub const MODERATE_THRESHOLD_PCT: f64 = 30.0;

/// Usage share at or above which the fallback explanation calls the slot
/// an established pattern.
pub const ESTABLISHED_PATTERN_PCT: f64 = 30.0;

/// Default database location relative to the working root.
pub const DEFAULT_DB_DIR: &str = ".putaway";
pub const DEFAULT_DB_FILE: &str = "putaway.db";

/// Config file looked up by `PutawayConfig::load`.
pub const CONFIG_FILE_NAME: &str = "putaway.toml";
