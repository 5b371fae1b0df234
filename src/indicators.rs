//! Indicator rename registry.
//!
//! The source data labels each reading with a long instrument descriptor.
//! This is the single source of truth for the short display aliases used in
//! the source picker and in chart tooltips.

// ---------------------------------------------------------------------------
// Alias table
// ---------------------------------------------------------------------------

/// A long instrument label and its display alias.
pub struct IndicatorAlias {
    pub label: &'static str,
    pub alias: &'static str,
}

/// Satellite missions and the derived trend series, oldest mission first.
pub static INDICATOR_ALIASES: &[IndicatorAlias] = &[
    IndicatorAlias {
        label: "Change in mean sea level: Sea level: TOPEX.Poseidon",
        alias: "Poseidon",
    },
    IndicatorAlias {
        label: "Change in mean sea level: Sea level: Jason.1",
        alias: "Jason.1",
    },
    IndicatorAlias {
        label: "Change in mean sea level: Sea level: Jason.2",
        alias: "Jason.2",
    },
    IndicatorAlias {
        label: "Change in mean sea level: Sea level: Jason.3",
        alias: "Jason.3",
    },
    IndicatorAlias {
        label: "Change in mean sea level: Sea level: Sentinel-6MF",
        alias: "Sentinel-6MF",
    },
    IndicatorAlias {
        label: "Change in mean sea level: Sea level: Trend",
        alias: "Trend",
    },
];

/// Looks up the alias for a long label. Returns `None` if unmapped.
pub fn find_alias(label: &str) -> Option<&'static str> {
    INDICATOR_ALIASES
        .iter()
        .find(|a| a.label == label)
        .map(|a| a.alias)
}

/// Returns the display alias for `label`, or `label` itself when unmapped.
pub fn display_label(label: &str) -> String {
    let trimmed = label.trim();
    find_alias(trimmed).unwrap_or(trimmed).to_string()
}

/// True when `label` is one of the known aliases (already short).
pub fn is_alias(label: &str) -> bool {
    INDICATOR_ALIASES.iter().any(|a| a.alias == label)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
