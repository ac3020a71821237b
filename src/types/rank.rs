use serde::{Deserialize, Serialize};

/// Destination of the "rate us" button for browsers that have a store page.
pub const RATE_PAGE_CHROME: &str =
    "https://chrome.google.com/webstore/detail/adblocker-ultimate/ohahllgiabjaoigichmmfljhkcfikeof/reviews";
pub const RATE_PAGE_FIREFOX: &str =
    "https://addons.mozilla.org/en-US/firefox/addon/adblocker-ultimate/reviews/add";
pub const RATE_PAGE_OPERA: &str =
    "https://addons.opera.com/en/extensions/details/adblock-ultimate#feedback-container";

/// Donation page used by the "contribute" prompt.
pub const CONTRIBUTE_PAGE: &str = "https://adblockultimate.net/donate.html";

/// Highest rank level.
pub const MAX_RANK_LEVEL: u8 = 3;

/// Browser the extension is running in. Injected from settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Browser {
    #[default]
    Chrome,
    Firefox,
    Opera,
    Safari,
    Edge,
}

impl Browser {
    /// Store review page for this browser, if it has one.
    pub fn rate_page(&self) -> Option<&'static str> {
        match self {
            Browser::Chrome => Some(RATE_PAGE_CHROME),
            Browser::Firefox => Some(RATE_PAGE_FIREFOX),
            Browser::Opera => Some(RATE_PAGE_OPERA),
            Browser::Safari | Browser::Edge => None,
        }
    }
}

/// What the promotion panel asks the user to do.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PromptAction {
    #[default]
    None,
    Rate,
    Contribute,
}

/// One loyalty tier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RankTier {
    pub level: u8,
    pub label: String,
    pub threshold_count: u64,
    pub logo: String,
    pub prompt_action: PromptAction,
    /// Where the prompt button leads. Empty when there is no action.
    pub button_url: String,
}

/// Static definition of a tier; turned into a [`RankTier`] per request.
#[derive(Debug, Clone, Copy)]
pub struct TierDefinition {
    pub level: u8,
    pub label: &'static str,
    pub threshold_count: u64,
    pub logo: &'static str,
}

/// The fixed tier table. Thresholds are strictly increasing.
pub const RANK_TIERS: [TierDefinition; 4] = [
    TierDefinition { level: 0, label: "newbie", threshold_count: 0, logo: "icons/detailed/logo.png" },
    TierDefinition { level: 1, label: "bronze", threshold_count: 1_000, logo: "icons/detailed/logo-bronze.png" },
    TierDefinition { level: 2, label: "silver", threshold_count: 10_000, logo: "icons/detailed/logo-silver.png" },
    TierDefinition { level: 3, label: "gold", threshold_count: 100_000, logo: "icons/detailed/logo-gold.png" },
];

/// Persisted per-user rank state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserRankState {
    pub current_level: u8,
    pub has_rated: bool,
    pub show_promotion_again: bool,
}

impl Default for UserRankState {
    fn default() -> Self {
        Self {
            current_level: 0,
            has_rated: false,
            show_promotion_again: true,
        }
    }
}
