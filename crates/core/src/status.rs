use crate::view::{lock, ElementId, SharedView, View};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Success => f.write_str("success"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// The transient status banner.
///
/// Each message is visible until `timeout` after it was shown. A newer message
/// replaces the pending retraction of the older one, so it always gets its full
/// visibility window.
pub struct StatusBoard<V> {
    view: SharedView<V>,
    timeout: Duration,
    current: Arc<AtomicU64>,
}

impl<V> Clone for StatusBoard<V> {
    fn clone(&self) -> Self {
        Self {
            view: Arc::clone(&self.view),
            timeout: self.timeout,
            current: Arc::clone(&self.current),
        }
    }
}

impl<V: View + 'static> StatusBoard<V> {
    pub fn new(view: SharedView<V>, timeout: Duration) -> Self {
        Self {
            view,
            timeout,
            current: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn show(&self, message: &str, severity: Severity) {
        let mut view = lock(&self.view);
        self.show_locked(&mut *view, message, severity);
    }

    /// Same as [`show`](Self::show) for callers already holding the view lock.
    pub fn show_locked(&self, view: &mut V, message: &str, severity: Severity) {
        let token = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        view.set_text(ElementId::StatusMessage, message);
        view.set_class(ElementId::StatusMessage, &format!("status {severity} show"));

        let shared = Arc::clone(&self.view);
        let current = Arc::clone(&self.current);
        let timeout = self.timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            let mut view = lock(&shared);
            if current.load(Ordering::SeqCst) == token {
                view.set_class(ElementId::StatusMessage, &format!("status {severity}"));
            }
        });
    }
}
