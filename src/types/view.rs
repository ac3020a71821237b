use serde::{Deserialize, Serialize};

/// Ordered list of blocks the popup renders for one tab state.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ViewPlan {
    pub blocks: Vec<ViewBlock>,
    /// Whole popup is drawn in its "disabled" style (site whitelisted).
    pub disabled: bool,
}

impl ViewPlan {
    pub fn top_message(&self) -> Option<&TopMessage> {
        self.blocks.iter().find_map(|b| match b {
            ViewBlock::TopMessage(m) => Some(m),
            _ => None,
        })
    }

    pub fn has_site_exception(&self) -> bool {
        self.blocks.iter().any(|b| matches!(b, ViewBlock::SiteException))
    }

    /// Checked state of the filtering checkbox, if it is shown.
    pub fn filtering_checkbox(&self) -> Option<bool> {
        self.blocks.iter().find_map(|b| match b {
            ViewBlock::FilteringCheckbox { checked } => Some(*checked),
            _ => None,
        })
    }

    pub fn actions(&self) -> &[ActionItem] {
        self.blocks
            .iter()
            .find_map(|b| match b {
                ViewBlock::ActionsMenu(items) => Some(items.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn footer(&self) -> Option<FooterVariant> {
        self.blocks.iter().find_map(|b| match b {
            ViewBlock::Footer(v) => Some(*v),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "block", content = "data", rename_all = "camelCase")]
pub enum ViewBlock {
    TopMessage(TopMessage),
    SiteException,
    FilteringCheckbox { checked: bool },
    ActionsMenu(Vec<ActionItem>),
    Footer(FooterVariant),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "variant", rename_all = "camelCase")]
pub enum TopMessage {
    /// Ads on the page are already removed by a standalone AdGuard product.
    #[serde(rename_all = "camelCase")]
    AdguardDetected { product_name: Option<String> },
    ProtectionDisabled,
    SiteFilteringDisabled,
    /// Counters are pre-formatted with thousands separators.
    #[serde(rename_all = "camelCase")]
    Stats {
        tab_blocked: String,
        total_blocked: String,
        wide: bool,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "item", rename_all = "camelCase")]
pub enum ActionItem {
    Protection { disabled: bool },
    Assistant { hidden: bool },
    Abuse,
    SiteReport,
    Settings,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FooterVariant {
    Standard,
    Integration,
}
