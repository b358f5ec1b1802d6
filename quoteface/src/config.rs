//! Watchface configuration

/// Text shown in the quote field until the companion app sends one.
pub const DEFAULT_QUOTE: &str = "May The Force Be With You";

/// User facing watchface settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchfaceConfig {
    /// Show the time as `HH:MM` (24h) instead of `hh:MM` (12h)
    pub clock_24h: bool,
    /// Offset of the local time zone from UTC in seconds
    pub utc_offset_secs: i32,
    /// Quote shown after loading the watchface
    pub default_quote: &'static str,
}

impl Default for WatchfaceConfig {
    fn default() -> Self {
        Self {
            clock_24h: true,
            utc_offset_secs: 0,
            default_quote: DEFAULT_QUOTE,
        }
    }
}
