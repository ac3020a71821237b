use serde::{Deserialize, Serialize};

/// Filtering facts about the current tab, supplied by the background page
/// when the popup opens.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct TabInfoSnapshot {
    pub url: String,
    pub adguard_detected: bool,
    pub adguard_product_name: Option<String>,
    pub application_filtering_disabled: bool,
    pub url_filtering_disabled: bool,
    pub document_white_listed: bool,
    pub user_white_listed: bool,
    pub can_add_remove_rule: bool,
    pub total_blocked_tab: u64,
    pub total_blocked: u64,
}

impl TabInfoSnapshot {
    /// Filtering is off either for the whole application or for this URL.
    pub fn filtering_globally_disabled(&self) -> bool {
        self.url_filtering_disabled || self.application_filtering_disabled
    }
}

/// Environment options sent alongside the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PopupOptions {
    pub show_stats_supported: bool,
    pub is_safari_browser: bool,
    pub is_firefox_browser: bool,
    pub is_mac_os: bool,
}
