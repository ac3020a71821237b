//! View-state resolution for the toolbar popup.
//!
//! [`resolve`] maps a tab snapshot and popup options to the ordered list of
//! blocks the popup shows. It holds no state, so identical inputs always
//! produce identical plans.

use crate::types::tab_info::{PopupOptions, TabInfoSnapshot};
use crate::types::view::{ActionItem, FooterVariant, TopMessage, ViewBlock, ViewPlan};

/// Total counts at or above this get the wide stats layout.
pub const WIDE_STATS_THRESHOLD: u64 = 10_000_000;

/// Formats `value` with a space between each group of three digits.
pub fn format_number(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

/// Computes the popup layout for one tab state.
pub fn resolve(tab: &TabInfoSnapshot, options: &PopupOptions) -> ViewPlan {
    let mut blocks = Vec::with_capacity(5);

    if let Some(message) = top_message(tab, options) {
        blocks.push(ViewBlock::TopMessage(message));
    }
    if shows_site_exception(tab) {
        blocks.push(ViewBlock::SiteException);
    }
    if let Some(checked) = filtering_checkbox(tab) {
        blocks.push(ViewBlock::FilteringCheckbox { checked });
    }
    blocks.push(ViewBlock::ActionsMenu(actions(tab)));
    blocks.push(ViewBlock::Footer(footer(tab)));

    log::debug!("Resolved popup view for {}: {} blocks", tab.url, blocks.len());

    ViewPlan {
        blocks,
        disabled: tab.document_white_listed,
    }
}

fn top_message(tab: &TabInfoSnapshot, options: &PopupOptions) -> Option<TopMessage> {
    if tab.adguard_detected {
        let product_name = tab
            .adguard_product_name
            .clone()
            .filter(|name| !name.is_empty());
        Some(TopMessage::AdguardDetected { product_name })
    } else if tab.application_filtering_disabled {
        Some(TopMessage::ProtectionDisabled)
    } else if tab.url_filtering_disabled {
        Some(TopMessage::SiteFilteringDisabled)
    } else if options.show_stats_supported {
        Some(TopMessage::Stats {
            tab_blocked: format_number(tab.total_blocked_tab),
            total_blocked: format_number(tab.total_blocked),
            wide: tab.total_blocked >= WIDE_STATS_THRESHOLD,
        })
    } else {
        None
    }
}

/// Whitelisted by something other than the user, e.g. a filter exception.
fn shows_site_exception(tab: &TabInfoSnapshot) -> bool {
    !tab.filtering_globally_disabled() && tab.document_white_listed && !tab.user_white_listed
}

fn filtering_checkbox(tab: &TabInfoSnapshot) -> Option<bool> {
    if tab.filtering_globally_disabled() || !tab.can_add_remove_rule {
        return None;
    }
    Some(!tab.document_white_listed)
}

fn actions(tab: &TabInfoSnapshot) -> Vec<ActionItem> {
    let mut items = Vec::with_capacity(5);

    if !tab.adguard_detected && !tab.url_filtering_disabled {
        items.push(ActionItem::Protection {
            disabled: tab.application_filtering_disabled,
        });
    }
    if !tab.url_filtering_disabled {
        items.push(ActionItem::Assistant {
            hidden: tab.application_filtering_disabled || tab.document_white_listed,
        });
        items.push(ActionItem::Abuse);
    }
    if !tab.filtering_globally_disabled() {
        items.push(ActionItem::SiteReport);
    }
    if !tab.adguard_detected {
        items.push(ActionItem::Settings);
    }

    items
}

fn footer(tab: &TabInfoSnapshot) -> FooterVariant {
    if tab.adguard_detected {
        FooterVariant::Integration
    } else {
        FooterVariant::Standard
    }
}
