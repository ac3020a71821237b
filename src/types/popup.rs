use serde::{Deserialize, Serialize};

use super::tab_info::{PopupOptions, TabInfoSnapshot};

/// Reply to the popup's initial `getTabInfoForPopup` request.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PopupInit {
    pub frame_info: TabInfoSnapshot,
    #[serde(default)]
    pub options: PopupOptions,
}

/// Lifecycle of one popup instance. Closing is handled by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Rendered,
}

/// Pages the popup asks the background to open in a new tab.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OpenTarget {
    Settings,
    Assistant,
    SiteReport { url: String },
    FilteringLog,
    Link { url: String },
}
