//! Extension session core.
//!
//! One [`Extension`] exists per browser-extension session. It owns the
//! storage, the blocked stats store, the rank engine and settings, and is
//! passed by reference to the message handler and popup backends.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::services::rank_engine::{PromotionListener, RankEngine};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::stats_store::{StatsStore, StatsStoreTrait};
use crate::services::storage::{KeyValueStore, SqliteStorage};
use crate::types::rank::{Browser, RankTier};
use crate::types::tab_info::PopupOptions;

/// Collects promotion events until the UI layer picks them up.
#[derive(Default)]
pub struct PromotionQueue {
    pending: Mutex<Vec<RankTier>>,
}

impl PromotionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes every queued promotion, oldest first.
    pub fn drain(&self) -> Vec<RankTier> {
        self.pending
            .lock()
            .map(|mut pending| std::mem::take(&mut *pending))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PromotionListener for PromotionQueue {
    fn on_promotion(&self, tier: &RankTier) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.push(tier.clone());
        }
    }
}

/// Central struct holding the popup's background-side state.
pub struct Extension {
    pub storage: Arc<dyn KeyValueStore>,
    pub stats: Arc<StatsStore>,
    pub rank_engine: RankEngine,
    pub settings_engine: SettingsEngine,
    pub promotions: Arc<PromotionQueue>,
}

impl Extension {
    /// Opens the SQLite local storage at `db_path` and loads settings.
    pub fn new(db_path: &str, settings_path: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let storage: Arc<dyn KeyValueStore> = Arc::new(SqliteStorage::open(db_path)?);
        let mut settings_engine = SettingsEngine::new(settings_path);
        settings_engine.load()?;
        Ok(Self::with_storage(storage, settings_engine))
    }

    /// Builds an extension on top of an existing store with the engine's
    /// current settings.
    pub fn with_storage(storage: Arc<dyn KeyValueStore>, settings_engine: SettingsEngine) -> Self {
        let settings = settings_engine.get_settings();
        let stats = Arc::new(StatsStore::with_save_delay(
            Arc::clone(&storage),
            Duration::from_millis(settings.stats.save_delay_ms),
        ));
        let promotions = Arc::new(PromotionQueue::new());
        let listener: Arc<dyn PromotionListener> = promotions.clone();
        let rank_engine = RankEngine::new(Arc::clone(&storage), Arc::clone(&stats), settings.general.browser)
            .with_listener(listener);

        Self {
            storage,
            stats,
            rank_engine,
            settings_engine,
            promotions,
        }
    }

    /// Options sent to a popup together with its tab snapshot.
    pub fn popup_options(&self) -> PopupOptions {
        let settings = self.settings_engine.get_settings();
        PopupOptions {
            show_stats_supported: settings.popup.show_stats_supported,
            is_safari_browser: settings.general.browser == Browser::Safari,
            is_firefox_browser: settings.general.browser == Browser::Firefox,
            is_mac_os: cfg!(target_os = "macos"),
        }
    }

    /// Re-applies settings that live inside engines after a settings change.
    pub fn apply_settings(&mut self) {
        let settings = self.settings_engine.get_settings();
        let browser = settings.general.browser;
        let save_delay = Duration::from_millis(settings.stats.save_delay_ms);
        self.stats.set_save_delay(save_delay);
        self.rank_engine.set_browser(browser);
    }

    /// Commits any pending stats write.
    pub fn shutdown(&self) {
        self.stats.flush();
    }
}
