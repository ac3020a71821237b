use serde::{Deserialize, Serialize};

/// State of the abuse/feedback modal inside the popup.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackForm {
    pub open: bool,
    pub topic: Option<String>,
    pub comment: String,
    /// Inline "select a topic" error is visible.
    pub error_shown: bool,
}

impl FeedbackForm {
    /// Topic with surrounding whitespace removed, or `None` when blank.
    pub fn selected_topic(&self) -> Option<&str> {
        self.topic
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}
