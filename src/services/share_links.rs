//! Social share links opened from the popup's share box.

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::services::view_resolver::format_number;

/// Landing page every share link points at.
pub const SHARE_URL: &str = "https://adblockultimate.net/";

const FACEBOOK_APP_ID: &str = "759703234176582";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SocialNetwork {
    Facebook,
    Twitter,
}

/// Text posted with the link.
pub fn share_message(blocked_count: u64) -> String {
    if blocked_count > 0 {
        format!(
            "I blocked {} ads and trackers thanks to AdBlocker Ultimate.",
            format_number(blocked_count)
        )
    } else {
        "AdBlocker Ultimate - And all annoying ads are OUT!".to_string()
    }
}

/// Builds the share dialog URL for `network` with query parameters encoded.
pub fn share_link(network: SocialNetwork, blocked_count: u64) -> String {
    let message = share_message(blocked_count);
    let url = match network {
        SocialNetwork::Facebook => {
            let actions = serde_json::json!([
                { "name": "Download AdBlocker Ultimate", "link": SHARE_URL }
            ])
            .to_string();
            Url::parse_with_params(
                "https://www.facebook.com/dialog/feed",
                &[
                    ("app_id", FACEBOOK_APP_ID),
                    ("link", SHARE_URL),
                    ("redirect_uri", "https://www.facebook.com/"),
                    ("ref", "adcounter"),
                    ("name", message.as_str()),
                    ("actions", actions.as_str()),
                ],
            )
        }
        SocialNetwork::Twitter => Url::parse_with_params(
            "https://twitter.com/intent/tweet",
            &[
                ("text", message.as_str()),
                ("url", SHARE_URL),
                ("via", "AdBlockUltimate"),
            ],
        ),
    };

    match url {
        Ok(url) => url.to_string(),
        Err(e) => {
            // Base URLs are constants; this only fires if one is edited badly.
            log::error!("Failed to build share link for {:?}: {}", network, e);
            SHARE_URL.to_string()
        }
    }
}
