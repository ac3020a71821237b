use serde::{Deserialize, Serialize};

use super::rank::Browser;

/// Top-level extension settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ExtensionSettings {
    pub general: GeneralSettings,
    pub popup: PopupSettings,
    pub stats: StatsSettings,
}

/// General extension settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralSettings {
    pub browser: Browser,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            browser: Browser::Chrome,
        }
    }
}

/// Toolbar popup settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PopupSettings {
    /// The per-tab and total blocked counters are shown in the top block.
    pub show_stats_supported: bool,
    /// Blocked count is drawn on the toolbar icon badge.
    pub show_page_statistic: bool,
}

impl Default for PopupSettings {
    fn default() -> Self {
        Self {
            show_stats_supported: true,
            show_page_statistic: true,
        }
    }
}

/// Blocked-request statistics settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatsSettings {
    /// Debounce window for persisting the blocked counter.
    pub save_delay_ms: u64,
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self { save_delay_ms: 1000 }
    }
}
