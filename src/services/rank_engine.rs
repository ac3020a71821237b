//! Rank Engine for the AdBlocker Ultimate popup.
//!
//! Derives the user's loyalty tier from the cumulative blocked counter,
//! advances it when a threshold is crossed, and raises a promotion event
//! so the UI can ask the user to rate or contribute.

use std::sync::Arc;

use crate::services::stats_store::{StatsStore, StatsStoreTrait};
use crate::services::storage::{
    KeyValueStore, USER_RANK_KEY, USER_RATED_KEY, USER_SHOW_BADGE_KEY,
};
use crate::types::errors::StorageError;
use crate::types::rank::{
    Browser, PromptAction, RankTier, UserRankState, CONTRIBUTE_PAGE, MAX_RANK_LEVEL, RANK_TIERS,
};

/// Receives promotion events raised by [`RankEngine::update_total_blocked`].
pub trait PromotionListener: Send + Sync {
    fn on_promotion(&self, tier: &RankTier);
}

/// Result of one `update_total_blocked` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankProgress {
    pub total_blocked: u64,
    pub level: u8,
    /// The stored level moved up during this call.
    pub advanced: bool,
    /// Tier handed to the promotion listener, if one was signalled.
    pub promotion: Option<RankTier>,
}

/// Trait defining rank engine operations.
pub trait RankEngineTrait {
    fn get_user_rank(&self) -> RankTier;
    fn get_state(&self) -> UserRankState;
    fn get_total_blocked(&self) -> u64;
    fn update_total_blocked(&self, delta: u64) -> RankProgress;
    fn mark_rated(&self, rated: bool) -> Result<(), StorageError>;
    fn set_show_promotion_again(&self, show: bool) -> Result<(), StorageError>;
    fn reset_stats(&self);
}

/// Highest tier whose threshold `total` has reached, scanning up from `from`.
pub fn level_for_total(from: u8, total: u64) -> u8 {
    let mut level = from.min(MAX_RANK_LEVEL);
    for tier in RANK_TIERS.iter().skip(level as usize + 1) {
        if total < tier.threshold_count {
            break;
        }
        level = tier.level;
    }
    level
}

/// Rank engine backed by the shared stats store and key-value storage.
pub struct RankEngine {
    storage: Arc<dyn KeyValueStore>,
    stats: Arc<StatsStore>,
    browser: Browser,
    listener: Option<Arc<dyn PromotionListener>>,
}

impl RankEngine {
    pub fn new(storage: Arc<dyn KeyValueStore>, stats: Arc<StatsStore>, browser: Browser) -> Self {
        Self {
            storage,
            stats,
            browser,
            listener: None,
        }
    }

    pub fn with_listener(mut self, listener: Arc<dyn PromotionListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn browser(&self) -> Browser {
        self.browser
    }

    pub fn set_browser(&mut self, browser: Browser) {
        self.browser = browser;
    }

    pub fn stats(&self) -> &Arc<StatsStore> {
        &self.stats
    }

    fn read_flag(&self, key: &str, default: bool) -> bool {
        match self.storage.get(key) {
            Ok(Some(raw)) => match raw.trim() {
                "1" | "true" => true,
                "0" | "false" => false,
                other => {
                    log::warn!("Ignoring malformed value {:?} for {}", other, key);
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                log::error!("Error reading {} from storage, cause {}", key, e);
                default
            }
        }
    }

    fn write_flag(&self, key: &str, value: bool) -> Result<(), StorageError> {
        self.storage.set(key, if value { "1" } else { "0" })
    }

    fn read_level(&self) -> u8 {
        match self.storage.get(USER_RANK_KEY) {
            Ok(Some(raw)) => match raw.trim().parse::<u8>() {
                Ok(level) => level.min(MAX_RANK_LEVEL),
                Err(e) => {
                    log::warn!("Ignoring malformed user rank {:?}: {}", raw, e);
                    0
                }
            },
            Ok(None) => 0,
            Err(e) => {
                log::error!("Error reading user rank from storage, cause {}", e);
                0
            }
        }
    }

    /// Builds the tier for `level` with its prompt recomputed from the
    /// rated flag and browser.
    fn tier_for(&self, level: u8, has_rated: bool) -> RankTier {
        let def = RANK_TIERS[level.min(MAX_RANK_LEVEL) as usize];
        let rate_page = self.browser.rate_page();

        let (prompt_action, button_url) = match def.level {
            0 => (PromptAction::None, String::new()),
            MAX_RANK_LEVEL => (PromptAction::Contribute, CONTRIBUTE_PAGE.to_string()),
            _ => match rate_page {
                Some(url) if !has_rated => (PromptAction::Rate, url.to_string()),
                _ => (PromptAction::Contribute, CONTRIBUTE_PAGE.to_string()),
            },
        };

        RankTier {
            level: def.level,
            label: def.label.to_string(),
            threshold_count: def.threshold_count,
            logo: def.logo.to_string(),
            prompt_action,
            button_url,
        }
    }
}

impl RankEngineTrait for RankEngine {
    fn get_user_rank(&self) -> RankTier {
        let state = self.get_state();
        self.tier_for(state.current_level, state.has_rated)
    }

    fn get_state(&self) -> UserRankState {
        UserRankState {
            current_level: self.read_level(),
            has_rated: self.read_flag(USER_RATED_KEY, false),
            show_promotion_again: self.read_flag(USER_SHOW_BADGE_KEY, true),
        }
    }

    fn get_total_blocked(&self) -> u64 {
        self.stats.get().total_blocked
    }

    /// Adds `delta` to the counter and advances the rank by at most one tier.
    ///
    /// When several thresholds are crossed at once, the remaining tiers are
    /// reached on later calls.
    fn update_total_blocked(&self, delta: u64) -> RankProgress {
        let current = self.read_level();
        let total = self.stats.add_blocked(delta).total_blocked;
        let reached = level_for_total(current, total);

        let mut progress = RankProgress {
            total_blocked: total,
            level: current,
            advanced: false,
            promotion: None,
        };
        if reached <= current {
            return progress;
        }

        let next = current + 1;
        if let Err(e) = self.storage.set(USER_RANK_KEY, &next.to_string()) {
            // Retried on the next update since the stored level is unchanged.
            log::error!("Error saving user rank {}, cause {}", next, e);
            return progress;
        }
        progress.level = next;
        progress.advanced = true;
        log::info!("User rank advanced to {} at {} blocked requests", next, total);

        if self.read_flag(USER_SHOW_BADGE_KEY, true) {
            let tier = self.tier_for(next, self.read_flag(USER_RATED_KEY, false));
            if let Some(listener) = &self.listener {
                listener.on_promotion(&tier);
            }
            progress.promotion = Some(tier);
        }
        progress
    }

    fn mark_rated(&self, rated: bool) -> Result<(), StorageError> {
        self.write_flag(USER_RATED_KEY, rated)
    }

    fn set_show_promotion_again(&self, show: bool) -> Result<(), StorageError> {
        self.write_flag(USER_SHOW_BADGE_KEY, show)
    }

    /// Resets the blocked counter. The rank level is kept.
    fn reset_stats(&self) {
        self.stats.reset();
    }
}
