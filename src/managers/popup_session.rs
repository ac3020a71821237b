//! Popup Session for the AdBlocker Ultimate toolbar popup.
//!
//! One session lives for as long as the popup is open. It keeps the tab
//! snapshot received from the background page, applies user actions to it,
//! notifies the background of each intent and hands a freshly resolved
//! [`ViewPlan`] to the renderer after every change.

use std::future::Future;

use uuid::Uuid;

use crate::services::share_links::{share_link, SocialNetwork};
use crate::services::view_resolver;
use crate::types::errors::PopupError;
use crate::types::feedback::FeedbackForm;
use crate::types::popup::{OpenTarget, PopupInit, SessionState};
use crate::types::rank::CONTRIBUTE_PAGE;
use crate::types::tab_info::{PopupOptions, TabInfoSnapshot};
use crate::types::view::ViewPlan;

/// Background-page side of the popup's message channel.
///
/// Notifications are fire-and-forget; any acknowledgement is ignored.
pub trait PopupBackend {
    fn request_tab_info(&self) -> impl Future<Output = Result<PopupInit, PopupError>>;
    fn report_whitelist_change(&self, url: &str, added: bool);
    fn report_filtering_disabled_change(&self, disabled: bool);
    fn report_stats_reset(&self);
    fn report_feedback(&self, url: &str, topic: &str, comment: &str);
    fn report_show_page_statistic(&self, show: bool);
    fn open_tab(&self, target: OpenTarget);
    fn close_popup(&self);
}

/// Templating layer that draws a plan.
pub trait PopupRenderer {
    fn render(&self, plan: &ViewPlan);
}

/// Stateful orchestrator for one popup lifetime.
pub struct PopupSession<B: PopupBackend, R: PopupRenderer> {
    id: Uuid,
    backend: B,
    renderer: R,
    tab: Option<TabInfoSnapshot>,
    options: PopupOptions,
    plan: ViewPlan,
    feedback: FeedbackForm,
}

impl<B: PopupBackend, R: PopupRenderer> PopupSession<B, R> {
    pub fn new(backend: B, renderer: R) -> Self {
        Self {
            id: Uuid::new_v4(),
            backend,
            renderer,
            tab: None,
            options: PopupOptions::default(),
            plan: ViewPlan::default(),
            feedback: FeedbackForm::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        if self.tab.is_some() {
            SessionState::Rendered
        } else {
            SessionState::Uninitialized
        }
    }

    pub fn tab(&self) -> Option<&TabInfoSnapshot> {
        self.tab.as_ref()
    }

    pub fn options(&self) -> &PopupOptions {
        &self.options
    }

    pub fn plan(&self) -> &ViewPlan {
        &self.plan
    }

    pub fn feedback(&self) -> &FeedbackForm {
        &self.feedback
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Asks the background for the current tab and renders it.
    ///
    /// On failure the session stays uninitialized.
    pub async fn open(&mut self) -> Result<&ViewPlan, PopupError> {
        let init = self.backend.request_tab_info().await.map_err(|e| {
            log::error!("Popup {} failed to get tab info: {}", self.id, e);
            e
        })?;
        Ok(self.receive_tab_info(init.frame_info, init.options))
    }

    /// Installs a tab snapshot and renders it.
    pub fn receive_tab_info(&mut self, tab: TabInfoSnapshot, options: PopupOptions) -> &ViewPlan {
        log::debug!("Popup {} received tab info for {}", self.id, tab.url);
        self.tab = Some(tab);
        self.options = options;
        self.rerender();
        &self.plan
    }

    fn rerender(&mut self) {
        if let Some(tab) = &self.tab {
            self.plan = view_resolver::resolve(tab, &self.options);
            self.renderer.render(&self.plan);
        }
    }

    fn tab_mut(&mut self) -> Result<&mut TabInfoSnapshot, PopupError> {
        self.tab.as_mut().ok_or(PopupError::NotInitialized)
    }

    fn current_url(&self) -> Result<String, PopupError> {
        self.tab
            .as_ref()
            .map(|t| t.url.clone())
            .ok_or(PopupError::NotInitialized)
    }

    /// Whitelists or un-whitelists the current site on the user's behalf.
    ///
    /// Both whitelist flags move together so the site-exception notice does
    /// not appear for user-made exceptions.
    pub fn set_whitelisted(&mut self, whitelisted: bool) -> Result<(), PopupError> {
        let tab = self.tab_mut()?;
        tab.document_white_listed = whitelisted;
        tab.user_white_listed = whitelisted;
        let url = tab.url.clone();
        let adguard_detected = tab.adguard_detected;

        self.backend.report_whitelist_change(&url, whitelisted);
        self.rerender();

        if adguard_detected {
            self.backend.close_popup();
        }
        Ok(())
    }

    /// Flips the whitelist state; returns the new state.
    pub fn toggle_whitelist(&mut self) -> Result<bool, PopupError> {
        let whitelisted = !self.tab.as_ref().ok_or(PopupError::NotInitialized)?.document_white_listed;
        self.set_whitelisted(whitelisted)?;
        Ok(whitelisted)
    }

    /// Filtering checkbox changed; a checked box means filtering is on.
    pub fn set_site_filtering(&mut self, checked: bool) -> Result<(), PopupError> {
        self.set_whitelisted(!checked)
    }

    /// Pauses or resumes protection for the whole application; returns
    /// whether it is now disabled.
    pub fn toggle_protection(&mut self) -> Result<bool, PopupError> {
        let tab = self.tab_mut()?;
        let disabled = !tab.application_filtering_disabled;
        tab.application_filtering_disabled = disabled;

        self.backend.report_filtering_disabled_change(disabled);
        self.rerender();
        Ok(disabled)
    }

    /// Requests a counter reset and shows zero without waiting for it.
    pub fn reset_stats(&mut self) -> Result<(), PopupError> {
        if self.tab.is_none() {
            return Err(PopupError::NotInitialized);
        }
        self.backend.report_stats_reset();
        self.tab_mut()?.total_blocked = 0;
        self.rerender();
        Ok(())
    }

    pub fn open_feedback(&mut self) {
        self.feedback.open = true;
    }

    /// Closes the modal and clears the topic and error.
    pub fn cancel_feedback(&mut self) {
        self.feedback = FeedbackForm {
            comment: std::mem::take(&mut self.feedback.comment),
            ..FeedbackForm::default()
        };
    }

    pub fn select_feedback_topic(&mut self, topic: &str) {
        self.feedback.topic = Some(topic.to_string());
        self.feedback.error_shown = false;
    }

    pub fn set_feedback_comment(&mut self, comment: &str) {
        self.feedback.comment = comment.to_string();
    }

    /// Sends the feedback form. Without a topic the inline error is shown
    /// and nothing is sent.
    pub fn submit_feedback(&mut self) -> Result<(), PopupError> {
        let url = self.current_url()?;
        let Some(topic) = self.feedback.selected_topic().map(str::to_string) else {
            self.feedback.error_shown = true;
            log::warn!("Popup {} rejected feedback without a topic", self.id);
            return Err(PopupError::InvalidFeedbackSubmission);
        };

        self.backend.report_feedback(&url, &topic, &self.feedback.comment);
        self.feedback = FeedbackForm::default();
        Ok(())
    }

    pub fn open_settings(&self) {
        self.open_and_close(OpenTarget::Settings);
    }

    pub fn open_assistant(&self) {
        self.open_and_close(OpenTarget::Assistant);
    }

    pub fn open_filtering_log(&self) {
        self.open_and_close(OpenTarget::FilteringLog);
    }

    pub fn open_site_report(&self) -> Result<(), PopupError> {
        let url = self.current_url()?;
        self.open_and_close(OpenTarget::SiteReport { url });
        Ok(())
    }

    pub fn open_link(&self, url: &str) {
        self.open_and_close(OpenTarget::Link { url: url.to_string() });
    }

    /// Opens a share dialog mentioning the total blocked count.
    pub fn share(&self, network: SocialNetwork) -> Result<(), PopupError> {
        let total = self.tab.as_ref().ok_or(PopupError::NotInitialized)?.total_blocked;
        self.backend.open_tab(OpenTarget::Link { url: share_link(network, total) });
        Ok(())
    }

    pub fn donate(&self) {
        self.backend.open_tab(OpenTarget::Link { url: CONTRIBUTE_PAGE.to_string() });
    }

    /// Toggles the blocked count on the toolbar icon.
    pub fn set_show_page_statistic(&self, show: bool) {
        self.backend.report_show_page_statistic(show);
    }

    fn open_and_close(&self, target: OpenTarget) {
        self.backend.open_tab(target);
        self.backend.close_popup();
    }
}
