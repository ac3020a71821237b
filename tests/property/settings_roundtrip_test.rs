//! Property-based tests for settings persistence.
//!
//! Any valid `ExtensionSettings` written through the engine must load back
//! unchanged from disk.

use abu_popup::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use abu_popup::types::rank::Browser;
use abu_popup::types::settings::{ExtensionSettings, GeneralSettings, PopupSettings, StatsSettings};
use proptest::prelude::*;
use tempfile::TempDir;

fn arb_browser() -> impl Strategy<Value = Browser> {
    prop_oneof![
        Just(Browser::Chrome),
        Just(Browser::Firefox),
        Just(Browser::Opera),
        Just(Browser::Safari),
        Just(Browser::Edge),
    ]
}

fn arb_settings() -> impl Strategy<Value = ExtensionSettings> {
    (
        arb_browser(),
        any::<bool>(),
        any::<bool>(),
        0u64..=60_000,
    )
        .prop_map(
            |(browser, show_stats_supported, show_page_statistic, save_delay_ms)| {
                ExtensionSettings {
                    general: GeneralSettings { browser },
                    popup: PopupSettings {
                        show_stats_supported,
                        show_page_statistic,
                    },
                    stats: StatsSettings { save_delay_ms },
                }
            },
        )
}

// Applying every field through dot-notation keys and reloading from disk
// reproduces the same settings.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn settings_survive_save_and_reload(settings in arb_settings()) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json").to_string_lossy().to_string();

        let mut engine = SettingsEngine::new(Some(path.clone()));
        engine.load().unwrap();
        engine.set_value("general.browser", serde_json::to_value(settings.general.browser).unwrap()).unwrap();
        engine.set_value("popup.show_stats_supported", serde_json::json!(settings.popup.show_stats_supported)).unwrap();
        engine.set_value("popup.show_page_statistic", serde_json::json!(settings.popup.show_page_statistic)).unwrap();
        engine.set_value("stats.save_delay_ms", serde_json::json!(settings.stats.save_delay_ms)).unwrap();
        prop_assert_eq!(engine.get_settings(), &settings);

        let mut reloaded = SettingsEngine::new(Some(path));
        prop_assert_eq!(reloaded.load().unwrap(), settings);
    }
}
