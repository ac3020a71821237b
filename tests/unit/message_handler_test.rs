//! Unit tests for the popup message handler: every method dispatched by
//! `handle_method`.
//!
//! These tests go through the same code path as the `abu-popup-rpc` binary,
//! using a temporary on-disk SQLite database and settings file. Most tests
//! run without a tokio runtime, so stats writes land immediately.

use std::sync::Mutex;

use serde_json::json;
use tempfile::TempDir;

use abu_popup::app::Extension;
use abu_popup::message_handler::handle_method;
use abu_popup::services::stats_store::StatsStoreTrait;
use abu_popup::services::storage::{KeyValueStore, PAGE_STATISTIC_KEY};

/// Create a fresh Extension backed by a temp directory.
fn setup() -> (Mutex<Extension>, TempDir) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let ext = open(&tmp);
    (Mutex::new(ext), tmp)
}

fn open(tmp: &TempDir) -> Extension {
    let db_path = tmp.path().join("abu-popup.db");
    let settings_path = tmp.path().join("settings.json");
    Extension::new(
        db_path.to_str().unwrap(),
        Some(settings_path.to_string_lossy().to_string()),
    )
    .expect("Failed to init Extension")
}

// ─── Ping & unknown ───

#[test]
fn test_ping() {
    let (ext, _tmp) = setup();
    let res = handle_method(&ext, "ping", &json!({})).unwrap();
    assert_eq!(res, json!({"pong": true}));
}

#[test]
fn test_unknown_method_returns_error() {
    let (ext, _tmp) = setup();
    let res = handle_method(&ext, "bookmark.add", &json!({}));
    assert!(res.unwrap_err().contains("unknown method"));
}

// ─── Rank & stats ───

#[test]
fn test_fresh_rank_is_newbie() {
    let (ext, _tmp) = setup();
    let rank = handle_method(&ext, "getUserRank", &json!({})).unwrap();
    assert_eq!(rank["level"], 0);
    assert_eq!(rank["label"], "newbie");
    assert_eq!(rank["promptAction"], "none");

    let total = handle_method(&ext, "getTotalBlocked", &json!({})).unwrap();
    assert_eq!(total, json!({"totalBlocked": 0}));
}

#[test]
fn test_update_total_blocked_promotes() {
    let (ext, _tmp) = setup();

    let res = handle_method(&ext, "updateTotalBlocked", &json!({"blocked": 600})).unwrap();
    assert_eq!(res, json!({"totalBlocked": 600, "rank": 0, "promoted": false}));

    let res = handle_method(&ext, "updateTotalBlocked", &json!({"blocked": 400})).unwrap();
    assert_eq!(res, json!({"totalBlocked": 1000, "rank": 1, "promoted": true}));

    let promotions = handle_method(&ext, "getPromotions", &json!({})).unwrap();
    let arr = promotions.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["label"], "bronze");
    assert_eq!(arr[0]["promptAction"], "rate");

    let again = handle_method(&ext, "getPromotions", &json!({})).unwrap();
    assert_eq!(again, json!([]));
}

#[test]
fn test_update_total_blocked_requires_count() {
    let (ext, _tmp) = setup();
    let err = handle_method(&ext, "updateTotalBlocked", &json!({"blocked": "many"})).unwrap_err();
    assert_eq!(err, "missing blocked");
}

#[test]
fn test_badge_disabled_suppresses_promotion() {
    let (ext, _tmp) = setup();
    handle_method(&ext, "setShowBadgeAgain", &json!({"show": false})).unwrap();

    let res = handle_method(&ext, "updateTotalBlocked", &json!({"blocked": 1000})).unwrap();
    assert_eq!(res["rank"], 1);
    assert_eq!(res["promoted"], false);
    assert_eq!(handle_method(&ext, "getPromotions", &json!({})).unwrap(), json!([]));
}

#[test]
fn test_rated_user_gets_contribute_prompt() {
    let (ext, _tmp) = setup();
    handle_method(&ext, "updateTotalBlocked", &json!({"blocked": 1000})).unwrap();
    handle_method(&ext, "updateUserRated", &json!({"rated": true})).unwrap();

    let rank = handle_method(&ext, "getUserRank", &json!({})).unwrap();
    assert_eq!(rank["promptAction"], "contribute");
    assert_eq!(rank["buttonUrl"], "https://adblockultimate.net/donate.html");
}

#[test]
fn test_reset_blocked_ads_count() {
    let (ext, _tmp) = setup();
    handle_method(&ext, "updateTotalBlocked", &json!({"blocked": 1500})).unwrap();

    handle_method(&ext, "resetBlockedAdsCount", &json!({})).unwrap();

    let total = handle_method(&ext, "getTotalBlocked", &json!({})).unwrap();
    assert_eq!(total["totalBlocked"], 0);
    let rank = handle_method(&ext, "getUserRank", &json!({})).unwrap();
    assert_eq!(rank["level"], 1);
}

#[test]
fn test_counter_survives_restart() {
    let tmp = TempDir::new().unwrap();
    {
        let ext = Mutex::new(open(&tmp));
        handle_method(&ext, "updateTotalBlocked", &json!({"blocked": 42})).unwrap();
        ext.lock().unwrap().shutdown();
    }

    let ext = Mutex::new(open(&tmp));
    let total = handle_method(&ext, "getTotalBlocked", &json!({})).unwrap();
    assert_eq!(total["totalBlocked"], 42);
}

// ─── Popup view ───

#[test]
fn test_resolve_view_uses_stored_options() {
    let (ext, _tmp) = setup();
    let plan = handle_method(
        &ext,
        "resolveView",
        &json!({"frameInfo": {
            "url": "https://example.org/",
            "canAddRemoveRule": true,
            "totalBlockedTab": 3,
            "totalBlocked": 12345
        }}),
    )
    .unwrap();

    assert_eq!(plan["disabled"], false);
    assert_eq!(plan["blocks"][0]["data"]["variant"], "stats");
    assert_eq!(plan["blocks"][0]["data"]["totalBlocked"], "12 345");
    assert_eq!(plan["blocks"][1], json!({"block": "filteringCheckbox", "data": {"checked": true}}));
}

#[test]
fn test_resolve_view_with_explicit_options() {
    let (ext, _tmp) = setup();
    let plan = handle_method(
        &ext,
        "resolveView",
        &json!({
            "frameInfo": {"url": "https://example.org/", "urlFilteringDisabled": true},
            "options": {"showStatsSupported": false}
        }),
    )
    .unwrap();

    assert_eq!(plan["blocks"][0]["data"]["variant"], "siteFilteringDisabled");
}

#[test]
fn test_resolve_view_requires_frame_info() {
    let (ext, _tmp) = setup();
    let err = handle_method(&ext, "resolveView", &json!({})).unwrap_err();
    assert_eq!(err, "missing frameInfo");

    let err = handle_method(&ext, "resolveView", &json!({"frameInfo": {"url": 5}})).unwrap_err();
    assert!(err.starts_with("invalid frameInfo"));
}

#[test]
fn test_popup_options_follow_browser_setting() {
    let (ext, _tmp) = setup();
    handle_method(
        &ext,
        "settings.set",
        &json!({"key": "general.browser", "value": "Firefox"}),
    )
    .unwrap();

    let options = handle_method(&ext, "getPopupOptions", &json!({})).unwrap();
    assert_eq!(options["isFirefoxBrowser"], true);
    assert_eq!(options["isSafariBrowser"], false);
    assert_eq!(options["showStatsSupported"], true);
}

#[test]
fn test_browser_change_updates_rate_page() {
    let (ext, _tmp) = setup();
    handle_method(&ext, "updateTotalBlocked", &json!({"blocked": 1000})).unwrap();
    handle_method(
        &ext,
        "settings.set",
        &json!({"key": "general.browser", "value": "Safari"}),
    )
    .unwrap();

    let rank = handle_method(&ext, "getUserRank", &json!({})).unwrap();
    assert_eq!(rank["promptAction"], "contribute");
}

#[test]
fn test_show_page_statistic_toggle() {
    let (ext, _tmp) = setup();
    assert_eq!(handle_method(&ext, "showPageStatistic", &json!({})).unwrap(), json!(true));

    handle_method(&ext, "changeShowPageStatistic", &json!({"show": false})).unwrap();
    assert_eq!(handle_method(&ext, "showPageStatistic", &json!({})).unwrap(), json!(false));

    let settings = handle_method(&ext, "settings.get", &json!({})).unwrap();
    assert_eq!(settings["popup"]["show_page_statistic"], false);
}

// ─── Settings ───

#[test]
fn test_settings_set_rejects_unknown_key() {
    let (ext, _tmp) = setup();
    let err = handle_method(&ext, "settings.set", &json!({"key": "popup.theme", "value": 1})).unwrap_err();
    assert!(err.contains("popup.theme"));

    let err = handle_method(&ext, "settings.set", &json!({"value": 1})).unwrap_err();
    assert_eq!(err, "missing key");
}

#[tokio::test(start_paused = true)]
async fn test_save_delay_setting_applies_without_restart() {
    let (ext, _tmp) = setup();
    handle_method(
        &ext,
        "settings.set",
        &json!({"key": "stats.save_delay_ms", "value": 50}),
    )
    .unwrap();
    assert_eq!(
        ext.lock().unwrap().stats.save_delay(),
        std::time::Duration::from_millis(50)
    );

    handle_method(&ext, "updateTotalBlocked", &json!({"blocked": 7})).unwrap();
    assert!(ext.lock().unwrap().stats.has_pending_write());

    // Well short of the one-second default window.
    tokio::time::sleep(std::time::Duration::from_millis(80)).await;

    let e = ext.lock().unwrap();
    assert!(!e.stats.has_pending_write());
    assert_eq!(
        e.storage.get(PAGE_STATISTIC_KEY).unwrap().as_deref(),
        Some(r#"{"totalBlocked":7}"#)
    );
}
