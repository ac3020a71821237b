//! Background-side handler for popup messages.
//!
//! `handle_method` dispatches one message (named after the extension's
//! message `type`) to the [`Extension`] state and returns a JSON reply.
//! Kept apart from the stdio server so it can be unit-tested directly.

use std::sync::Mutex;

use serde_json::{json, Value};

use crate::app::Extension;
use crate::services::rank_engine::RankEngineTrait;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::services::view_resolver;
use crate::types::tab_info::{PopupOptions, TabInfoSnapshot};

fn param_u64(params: &Value, name: &str) -> Result<u64, String> {
    params
        .get(name)
        .and_then(|v| v.as_u64())
        .ok_or_else(|| format!("missing {}", name))
}

fn param_bool(params: &Value, name: &str) -> Result<bool, String> {
    params
        .get(name)
        .and_then(|v| v.as_bool())
        .ok_or_else(|| format!("missing {}", name))
}

/// Dispatch a popup message to the extension state.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(ext: &Mutex<Extension>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        // ─── Rank & stats ───
        "getUserRank" => {
            let e = ext.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(e.rank_engine.get_user_rank()).map_err(|e| e.to_string())
        }
        "getTotalBlocked" => {
            let e = ext.lock().map_err(|e| e.to_string())?;
            Ok(json!({"totalBlocked": e.rank_engine.get_total_blocked()}))
        }
        "updateTotalBlocked" => {
            let blocked = param_u64(params, "blocked")?;
            let e = ext.lock().map_err(|e| e.to_string())?;
            let progress = e.rank_engine.update_total_blocked(blocked);
            Ok(json!({
                "totalBlocked": progress.total_blocked,
                "rank": progress.level,
                "promoted": progress.promotion.is_some(),
            }))
        }
        "resetBlockedAdsCount" => {
            let e = ext.lock().map_err(|e| e.to_string())?;
            e.rank_engine.reset_stats();
            Ok(json!({"ok": true}))
        }
        "setShowBadgeAgain" => {
            let show = param_bool(params, "show")?;
            let e = ext.lock().map_err(|e| e.to_string())?;
            e.rank_engine.set_show_promotion_again(show).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "updateUserRated" => {
            let rated = param_bool(params, "rated")?;
            let e = ext.lock().map_err(|e| e.to_string())?;
            e.rank_engine.mark_rated(rated).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "getPromotions" => {
            let e = ext.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(e.promotions.drain()).map_err(|e| e.to_string())
        }

        // ─── Popup view ───
        "resolveView" => {
            let tab: TabInfoSnapshot = params
                .get("frameInfo")
                .cloned()
                .map(serde_json::from_value::<TabInfoSnapshot>)
                .ok_or("missing frameInfo")?
                .map_err(|e| format!("invalid frameInfo: {}", e))?;
            let options: PopupOptions = match params.get("options") {
                Some(v) => serde_json::from_value(v.clone())
                    .map_err(|e| format!("invalid options: {}", e))?,
                None => ext.lock().map_err(|e| e.to_string())?.popup_options(),
            };
            serde_json::to_value(view_resolver::resolve(&tab, &options)).map_err(|e| e.to_string())
        }
        "getPopupOptions" => {
            let e = ext.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(e.popup_options()).map_err(|e| e.to_string())
        }
        "showPageStatistic" => {
            let e = ext.lock().map_err(|e| e.to_string())?;
            Ok(json!(e.settings_engine.get_settings().popup.show_page_statistic))
        }
        "changeShowPageStatistic" => {
            let show = param_bool(params, "show")?;
            let mut e = ext.lock().map_err(|e| e.to_string())?;
            e.settings_engine
                .set_value("popup.show_page_statistic", json!(show))
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Settings ───
        "settings.get" => {
            let e = ext.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(e.settings_engine.get_settings()).map_err(|e| e.to_string())
        }
        "settings.set" => {
            let key = params.get("key").and_then(|v| v.as_str()).ok_or("missing key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut e = ext.lock().map_err(|e| e.to_string())?;
            e.settings_engine.set_value(key, value).map_err(|e| e.to_string())?;
            e.apply_settings();
            Ok(json!({"ok": true}))
        }

        // ─── Ping ───
        "ping" => Ok(json!({"pong": true})),

        _ => Err(format!("unknown method: {}", method)),
    }
}
