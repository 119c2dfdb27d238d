//! Insurance policy upload, mocked analysis and the "no policy" request form.

pub mod analysis;

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::domain::FileDescriptor;
use crate::errors::InsuranceError;
use crate::messages;
use crate::scheduler::TaskHandle;
use crate::wizard::missing_required;

pub use analysis::{CoverageLine, PolicyAnalysis, PolicyAnalyzer, StaticPolicyAnalyzer};

/// Required fields of the "no policy" request form.
pub const NO_POLICY_REQUIRED: &[&str] = &["full_name", "phone"];

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AnalysisStatus {
    #[default]
    Idle,
    Analyzing(TaskHandle),
    Done(PolicyAnalysis),
}

/// State of the insurance view.
#[derive(Debug, Clone, Default)]
pub struct InsurancePanel {
    consent: bool,
    policy: Option<FileDescriptor>,
    status: AnalysisStatus,
    no_policy_values: BTreeMap<String, String>,
    no_policy_sent: bool,
}

impl InsurancePanel {
    pub fn set_consent(&mut self, consent: bool) {
        self.consent = consent;
    }

    pub fn consent(&self) -> bool {
        self.consent
    }

    /// Replaces the uploaded policy and returns the status line.
    pub fn upload_policy(&mut self, policy: FileDescriptor) -> String {
        let status = messages::policy_loaded(&policy.name);
        info!(file = %policy.name, "policy uploaded");
        self.policy = Some(policy);
        status
    }

    pub fn clear_policy(&mut self) {
        self.policy = None;
    }

    pub fn policy(&self) -> Option<&FileDescriptor> {
        self.policy.as_ref()
    }

    pub fn policy_status(&self) -> String {
        match &self.policy {
            Some(policy) => messages::policy_loaded(&policy.name),
            None => messages::POLICY_NOT_UPLOADED.to_string(),
        }
    }

    /// Checks that an analysis may start. Consent is checked before the file.
    pub fn check_ready(&self) -> Result<(), InsuranceError> {
        if !self.consent {
            return Err(InsuranceError::ConsentMissing);
        }
        if self.policy.is_none() {
            return Err(InsuranceError::PolicyMissing);
        }
        if matches!(self.status, AnalysisStatus::Analyzing(_)) {
            return Err(InsuranceError::AnalysisPending);
        }
        Ok(())
    }

    /// Enters the analyzing state; `handle` is the scheduled completion.
    pub fn mark_analyzing(&mut self, handle: TaskHandle) {
        self.status = AnalysisStatus::Analyzing(handle);
    }

    /// Finishes the analysis scheduled as `handle`.
    ///
    /// Returns `false` when the view was torn down or a different analysis is
    /// in flight, leaving the panel untouched.
    pub fn complete_analysis(&mut self, handle: TaskHandle, analyzer: &dyn PolicyAnalyzer) -> bool {
        if self.status != AnalysisStatus::Analyzing(handle) {
            debug!(?handle, "stale analysis completion ignored");
            return false;
        }
        let Some(policy) = self.policy.as_ref() else {
            self.status = AnalysisStatus::Idle;
            return false;
        };
        self.status = AnalysisStatus::Done(analyzer.analyze(policy));
        true
    }

    pub fn status(&self) -> &AnalysisStatus {
        &self.status
    }

    pub fn pending_analysis(&self) -> Option<TaskHandle> {
        match self.status {
            AnalysisStatus::Analyzing(handle) => Some(handle),
            _ => None,
        }
    }

    /// Leaves the view: drops an in-flight analysis and returns its handle for cancellation.
    pub fn tear_down(&mut self) -> Option<TaskHandle> {
        let pending = self.pending_analysis();
        if pending.is_some() {
            self.status = AnalysisStatus::Idle;
        }
        pending
    }

    pub fn set_no_policy_field(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.no_policy_values.remove(field);
        } else {
            self.no_policy_values
                .insert(field.to_string(), value.to_string());
        }
    }

    /// Sends the request form. The form is hidden once sent.
    pub fn submit_no_policy(&mut self) -> Result<(), InsuranceError> {
        if let Some(field) = missing_required(NO_POLICY_REQUIRED, &self.no_policy_values)
            .into_iter()
            .next()
        {
            return Err(InsuranceError::MissingField(field));
        }
        self.no_policy_sent = true;
        Ok(())
    }

    pub fn no_policy_sent(&self) -> bool {
        self.no_policy_sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Scheduler;
    use std::time::Duration;

    fn policy() -> FileDescriptor {
        FileDescriptor::new("policy.pdf", 2048, "application/pdf")
    }

    #[test]
    fn consent_is_checked_before_the_file() {
        let mut panel = InsurancePanel::default();
        assert_eq!(panel.check_ready(), Err(InsuranceError::ConsentMissing));
        panel.set_consent(true);
        assert_eq!(panel.check_ready(), Err(InsuranceError::PolicyMissing));
        panel.upload_policy(policy());
        assert_eq!(panel.check_ready(), Ok(()));
    }

    #[test]
    fn completion_requires_the_current_handle() {
        let mut scheduler: Scheduler<()> = Scheduler::new();
        let first = scheduler.schedule(Duration::from_millis(10), ());
        let second = scheduler.schedule(Duration::from_millis(10), ());
        let mut panel = InsurancePanel::default();
        panel.set_consent(true);
        panel.upload_policy(policy());
        panel.mark_analyzing(second);
        assert_eq!(panel.check_ready(), Err(InsuranceError::AnalysisPending));

        assert!(!panel.complete_analysis(first, &StaticPolicyAnalyzer));
        assert!(panel.complete_analysis(second, &StaticPolicyAnalyzer));
        assert!(matches!(panel.status(), AnalysisStatus::Done(_)));
    }

    #[test]
    fn tear_down_drops_pending_analysis() {
        let mut scheduler: Scheduler<()> = Scheduler::new();
        let handle = scheduler.schedule(Duration::from_millis(10), ());
        let mut panel = InsurancePanel::default();
        panel.set_consent(true);
        panel.upload_policy(policy());
        panel.mark_analyzing(handle);
        assert_eq!(panel.tear_down(), Some(handle));
        assert_eq!(panel.status(), &AnalysisStatus::Idle);
        assert!(!panel.complete_analysis(handle, &StaticPolicyAnalyzer));
        assert_eq!(panel.tear_down(), None);
    }

    #[test]
    fn no_policy_form_requires_name_and_phone() {
        let mut panel = InsurancePanel::default();
        panel.set_no_policy_field("phone", "050-0000000");
        assert_eq!(
            panel.submit_no_policy(),
            Err(InsuranceError::MissingField("full_name".into()))
        );
        panel.set_no_policy_field("full_name", "דנה");
        assert_eq!(panel.submit_no_policy(), Ok(()));
        assert!(panel.no_policy_sent());
    }

    #[test]
    fn policy_status_line() {
        let mut panel = InsurancePanel::default();
        assert_eq!(panel.policy_status(), messages::POLICY_NOT_UPLOADED);
        panel.upload_policy(policy());
        assert!(panel.policy_status().contains("policy.pdf"));
    }
}
