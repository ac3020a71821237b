use serde::{Deserialize, Serialize};

/// Cumulative count of blocked requests, persisted under `page-statistic`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BlockedStats {
    #[serde(default)]
    pub total_blocked: u64,
}

impl BlockedStats {
    pub fn new(total_blocked: u64) -> Self {
        Self { total_blocked }
    }
}
