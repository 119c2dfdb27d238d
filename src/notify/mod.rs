//! Short-lived, stacked toast notifications.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Success => "✅",
            Severity::Error => "❌",
            Severity::Warning => "⚠️",
            Severity::Info => "ℹ️",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
    pub severity: Severity,
    pub raised_at: DateTime<Utc>,
    /// Virtual time after which the toast is dismissed automatically.
    pub expires_at: Duration,
}

/// Rendering hook invoked as toasts appear and disappear.
pub trait ToastSink {
    fn raised(&mut self, toast: &Toast);

    fn dismissed(&mut self, _toast: &Toast) {}
}

pub struct Notifier {
    lifetime: Duration,
    clock: Duration,
    active: Vec<Toast>,
    sink: Option<Box<dyn ToastSink>>,
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("lifetime", &self.lifetime)
            .field("clock", &self.clock)
            .field("active", &self.active)
            .finish()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(Duration::from_millis(3000))
    }
}

impl Notifier {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            clock: Duration::ZERO,
            active: Vec::new(),
            sink: None,
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn ToastSink>) -> Self {
        self.set_sink(sink);
        self
    }

    pub fn set_sink(&mut self, sink: Box<dyn ToastSink>) {
        self.sink = Some(sink);
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Raises a toast with the default lifetime.
    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) -> Uuid {
        self.notify_for(message, severity, self.lifetime)
    }

    pub fn notify_for(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        lifetime: Duration,
    ) -> Uuid {
        let toast = Toast {
            id: Uuid::new_v4(),
            message: message.into(),
            severity,
            raised_at: Utc::now(),
            expires_at: self.clock + lifetime,
        };
        debug!(%severity, message = %toast.message, "toast raised");
        if let Some(sink) = self.sink.as_mut() {
            sink.raised(&toast);
        }
        let id = toast.id;
        self.active.push(toast);
        id
    }

    /// Dismisses a toast early. Returns `false` if it was already gone.
    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let Some(index) = self.active.iter().position(|toast| toast.id == id) else {
            return false;
        };
        let toast = self.active.remove(index);
        if let Some(sink) = self.sink.as_mut() {
            sink.dismissed(&toast);
        }
        true
    }

    /// Advances the notifier clock and drops expired toasts. Returns how many expired.
    pub fn expire(&mut self, now: Duration) -> usize {
        self.clock = self.clock.max(now);
        let clock = self.clock;
        let (expired, kept): (Vec<Toast>, Vec<Toast>) = self
            .active
            .drain(..)
            .partition(|toast| toast.expires_at <= clock);
        self.active = kept;
        if let Some(sink) = self.sink.as_mut() {
            for toast in &expired {
                sink.dismissed(toast);
            }
        }
        expired.len()
    }

    /// Visible toasts, oldest first.
    pub fn active(&self) -> &[Toast] {
        &self.active
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.active.last()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}
