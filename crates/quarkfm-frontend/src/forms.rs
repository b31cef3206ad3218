//! Asynchronous form submission.
//!
//! Every form a page shows is an [`AutoSubmitForm`] registered when the page
//! is built. Submitting never leaves the page: the fields are serialized into
//! a [`FormRequest`], the submit control is locked until the response arrives,
//! and the outcome becomes a notification plus an optional redirect.

use std::time::Duration;

use quarkfm_bridge::{
    api::{FormFields, FormMethod, FormOutcome, FormRequest},
    notification::NotificationMessage,
};

/// Label shown on the submit control while a request is in flight.
pub const SUBMITTING_LABEL: &str = "Processing...";
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Operation succeeded";
pub const DEFAULT_FAILURE_MESSAGE: &str = "Operation failed";
/// Delay between a successful submission and following its redirect.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1000);

/// The button that submits a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitControl {
    idle_label: String,
    label: String,
    enabled: bool,
}

impl SubmitControl {
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            idle_label: label.clone(),
            label,
            enabled: true,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn engage(&mut self) {
        self.label = SUBMITTING_LABEL.to_owned();
        self.enabled = false;
    }

    fn restore(&mut self) {
        self.label = self.idle_label.clone();
        self.enabled = true;
    }
}

/// What the page has to do once a submission completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitEffects {
    pub notification: NotificationMessage,
    /// Target to navigate to after [`REDIRECT_DELAY`].
    pub redirect: Option<String>,
}

impl SubmitEffects {
    pub fn from_outcome(outcome: &FormOutcome) -> Self {
        match outcome {
            Ok(result) if result.success => Self {
                notification: NotificationMessage::success(
                    result.message().unwrap_or(DEFAULT_SUCCESS_MESSAGE),
                ),
                redirect: result.redirect().map(str::to_owned),
            },
            Ok(result) => Self {
                notification: NotificationMessage::error(
                    result.message().unwrap_or(DEFAULT_FAILURE_MESSAGE),
                ),
                redirect: None,
            },
            Err(reason) => Self {
                notification: NotificationMessage::error(format!("Network error: {reason}")),
                redirect: None,
            },
        }
    }
}

/// A form whose submission is turned into an asynchronous JSON request.
#[derive(Debug, Clone)]
pub struct AutoSubmitForm {
    action: String,
    method: FormMethod,
    submit: SubmitControl,
}

impl AutoSubmitForm {
    pub fn new(action: impl Into<String>, method: FormMethod, submit_label: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            method,
            submit: SubmitControl::new(submit_label),
        }
    }

    pub fn post(action: impl Into<String>, submit_label: impl Into<String>) -> Self {
        Self::new(action, FormMethod::Post, submit_label)
    }

    pub fn get(action: impl Into<String>, submit_label: impl Into<String>) -> Self {
        Self::new(action, FormMethod::Get, submit_label)
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn method(&self) -> FormMethod {
        self.method
    }

    pub fn submit_control(&self) -> &SubmitControl {
        &self.submit
    }

    pub fn is_submitting(&self) -> bool {
        !self.submit.is_enabled()
    }

    /// Serializes `fields` and locks the submit control. Returns `None` while
    /// a previous submission is still in flight, since the control is
    /// disabled then.
    pub fn submit<I, K, V>(&mut self, fields: I) -> Option<FormRequest>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        if self.is_submitting() {
            return None;
        }
        self.submit.engage();
        Some(FormRequest {
            action: self.action.clone(),
            method: self.method,
            fields: fields.into_iter().collect::<FormFields>(),
        })
    }

    /// Restores the submit control, whatever the outcome, and reports what
    /// to show and where to go.
    pub fn complete(&mut self, outcome: &FormOutcome) -> SubmitEffects {
        self.submit.restore();
        SubmitEffects::from_outcome(outcome)
    }
}

/// Styling of a selection control. A control starts out highlighted and falls
/// back to the plain style as soon as the user changes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectStyle {
    #[default]
    Highlighted,
    Plain,
}

impl SelectStyle {
    pub fn on_change(&mut self) {
        *self = Self::Plain;
    }
}

#[cfg(test)]
mod tests {
    use quarkfm_bridge::{api::ApiResult, notification::NotificationKind};

    use super::*;

    fn ok(result: ApiResult) -> FormOutcome {
        Ok(result)
    }

    #[test]
    fn submit_serializes_fields_and_locks_the_control() {
        let mut form = AutoSubmitForm::post("/api/classify/start", "Start classification");
        let request = form
            .submit([("batch", "30"), ("mode", "fast"), ("batch", "10")])
            .unwrap();

        assert_eq!(request.action, "/api/classify/start");
        assert_eq!(request.method, FormMethod::Post);
        assert_eq!(request.fields.get("batch"), Some("10"));
        assert_eq!(request.fields.len(), 2);

        assert!(form.is_submitting());
        assert!(!form.submit_control().is_enabled());
        assert_eq!(form.submit_control().label(), SUBMITTING_LABEL);
    }

    #[test]
    fn second_submit_while_in_flight_is_ignored() {
        let mut form = AutoSubmitForm::get("/api/check", "Check API");
        assert!(form.submit(Vec::<(String, String)>::new()).is_some());
        assert!(form.submit(Vec::<(String, String)>::new()).is_none());
    }

    #[test]
    fn control_is_restored_after_every_outcome() {
        let outcomes = [
            ok(ApiResult {
                success: true,
                ..Default::default()
            }),
            ok(ApiResult::default()),
            Err("connection refused".to_owned()),
        ];

        for outcome in &outcomes {
            let mut form = AutoSubmitForm::post("/forms/x", "Save");
            form.submit([("a", "b")]).unwrap();
            form.complete(outcome);

            assert!(form.submit_control().is_enabled());
            assert_eq!(form.submit_control().label(), "Save");
            assert!(form.submit([("a", "b")]).is_some());
        }
    }

    #[test]
    fn success_with_redirect() {
        let effects = SubmitEffects::from_outcome(&ok(ApiResult {
            success: true,
            redirect: Some("/done".into()),
            ..Default::default()
        }));

        assert_eq!(effects.notification.kind, NotificationKind::Success);
        assert_eq!(effects.notification.message, DEFAULT_SUCCESS_MESSAGE);
        assert_eq!(effects.redirect.as_deref(), Some("/done"));
    }

    #[test]
    fn failures_never_redirect() {
        let rejected = SubmitEffects::from_outcome(&ok(ApiResult {
            success: false,
            message: Some("Classification is already running".into()),
            redirect: Some("/done".into()),
            ..Default::default()
        }));
        assert_eq!(rejected.notification.kind, NotificationKind::Error);
        assert_eq!(rejected.notification.message, "Classification is already running");
        assert_eq!(rejected.redirect, None);

        let bare = SubmitEffects::from_outcome(&ok(ApiResult::default()));
        assert_eq!(bare.notification.message, DEFAULT_FAILURE_MESSAGE);

        let network = SubmitEffects::from_outcome(&Err("connection refused".into()));
        assert_eq!(network.notification.kind, NotificationKind::Error);
        assert_eq!(network.notification.message, "Network error: connection refused");
    }

    #[test]
    fn select_style_resets_on_change() {
        let mut style = SelectStyle::default();
        assert_eq!(style, SelectStyle::Highlighted);
        style.on_change();
        style.on_change();
        assert_eq!(style, SelectStyle::Plain);
    }
}
