//! Deployment configuration (SPEC_FULL.md §2 item 11; spec.md §8 Open
//! Questions re: timezone).

use serde::{Deserialize, Serialize};

/// Configuration for a single deployment of the scheduling engine.
///
/// Carried as plain data rather than environment reads scattered through
/// the core, matching the "no direct wall-clock reads elsewhere in the
/// core" discipline of spec.md §5: anything environment-dependent (zone,
/// default window, minimum break length) is threaded in explicitly.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// IANA zone name, carried as metadata only (spec.md §4.6/§9: this
    /// crate pins a single fixed offset rather than doing tz-database
    /// lookups).
    pub scheduling_zone: String,
    /// Minutes east of UTC for `scheduling_zone`, applied at generation and
    /// reporting time.
    pub zone_offset_minutes: i32,
    /// Default working window start, minutes from local midnight.
    pub default_window_start_minutes: u16,
    /// Default working window end, minutes from local midnight.
    pub default_window_end_minutes: u16,
    /// Minimum break duration accepted by `insert_break` (spec.md §4.4:
    /// `InvalidDuration` if below this).
    pub min_break_minutes: i64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            scheduling_zone: "UTC".into(),
            zone_offset_minutes: 0,
            default_window_start_minutes: 9 * 60,
            default_window_end_minutes: 17 * 60,
            min_break_minutes: 5,
        }
    }
}

impl SchedulerConfig {
    /// Parse from TOML text (e.g. a `daytrack.toml` deployment file).
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
