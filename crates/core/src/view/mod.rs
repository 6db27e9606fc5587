//! View surfaces the dashboard controller writes into.
//!
//! The controller never touches a concrete rendering target. It mutates named
//! elements through [`View`], shared as [`SharedView`]. `MemoryView` keeps the
//! element state for the web page (and for tests), `TerminalView` prints each
//! change as it happens.

pub mod memory;
pub mod terminal;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use memory::MemoryView;
pub use terminal::TerminalView;

/// The elements the dashboard binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementId {
    TotalEc2,
    IdleEc2,
    UnattachedEbs,
    PotentialSavings,
    ScanTime,
    RegionsSummary,
    StatusMessage,
    TriggerScan,
    ViewRecommendations,
}

impl ElementId {
    pub const ALL: [ElementId; 9] = [
        ElementId::TotalEc2,
        ElementId::IdleEc2,
        ElementId::UnattachedEbs,
        ElementId::PotentialSavings,
        ElementId::ScanTime,
        ElementId::RegionsSummary,
        ElementId::StatusMessage,
        ElementId::TriggerScan,
        ElementId::ViewRecommendations,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ElementId::TotalEc2 => "total-ec2",
            ElementId::IdleEc2 => "idle-ec2",
            ElementId::UnattachedEbs => "unattached-ebs",
            ElementId::PotentialSavings => "potential-savings",
            ElementId::ScanTime => "scan-time",
            ElementId::RegionsSummary => "regions-summary",
            ElementId::StatusMessage => "status-message",
            ElementId::TriggerScan => "trigger-scan",
            ElementId::ViewRecommendations => "view-recommendations",
        }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait View: Send {
    /// Replace the element's text content.
    fn set_text(&mut self, id: ElementId, text: &str);

    /// Replace the element's inner markup wholesale.
    fn set_html(&mut self, id: ElementId, html: &str);

    fn set_class(&mut self, id: ElementId, class: &str);

    fn set_disabled(&mut self, id: ElementId, disabled: bool);

    fn is_disabled(&self, id: ElementId) -> bool;
}

pub type SharedView<V> = Arc<Mutex<V>>;

pub fn shared<V: View>(view: V) -> SharedView<V> {
    Arc::new(Mutex::new(view))
}

/// Lock the view, recovering from a writer that panicked mid-update: every
/// write is a whole-value overwrite, so the state is never half-applied.
pub fn lock<V>(view: &Mutex<V>) -> MutexGuard<'_, V> {
    view.lock().unwrap_or_else(PoisonError::into_inner)
}
