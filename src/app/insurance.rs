//! Insurance view handlers.

use tracing::info;

use crate::domain::FileDescriptor;
use crate::errors::{InsuranceError, SessionError};
use crate::messages;
use crate::notify::Severity;
use crate::scheduler::TaskHandle;
use crate::wizard::FormSurface;

use super::{Deferred, Session};

impl<S: FormSurface> Session<S> {
    pub fn set_policy_consent(&mut self, consent: bool) {
        self.insurance.set_consent(consent);
    }

    /// Loads a policy document and returns the status line shown under the upload zone.
    pub fn upload_policy(&mut self, policy: FileDescriptor) -> String {
        let status = self.insurance.upload_policy(policy);
        self.notifier
            .notify(messages::POLICY_UPLOADED, Severity::Success);
        status
    }

    /// Starts the mocked analysis; it completes after the configured delay.
    pub fn analyze_policy(&mut self) -> Result<TaskHandle, SessionError> {
        if let Err(err) = self.insurance.check_ready() {
            let message = match err {
                InsuranceError::ConsentMissing => Some(messages::CONSENT_REQUIRED),
                InsuranceError::PolicyMissing => Some(messages::POLICY_REQUIRED),
                _ => None,
            };
            if let Some(message) = message {
                self.notifier.notify(message, Severity::Error);
            }
            return Err(err.into());
        }
        let handle = self
            .scheduler
            .schedule(self.config.analysis_delay(), Deferred::CompleteAnalysis);
        self.insurance.mark_analyzing(handle);
        info!(?handle, "policy analysis started");
        Ok(handle)
    }

    pub fn set_no_policy_field(&mut self, field: &str, value: &str) {
        self.insurance.set_no_policy_field(field, value);
    }

    /// Sends the "no policy" request form.
    pub fn submit_no_policy(&mut self) -> Result<(), SessionError> {
        if let Err(err) = self.insurance.submit_no_policy() {
            self.notifier
                .notify(messages::FILL_REQUIRED_FIELDS, Severity::Warning);
            return Err(err.into());
        }
        info!("no-policy request sent");
        self.notifier
            .notify(messages::NO_POLICY_SENT, Severity::Success);
        Ok(())
    }
}
