//! User-facing output: notices and state re-renders.

use crate::render;
use crate::timeline::AppState;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
    Info,
}

/// A blocking-style message shown to the user right away
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Failure,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }
}

/// Receives everything the controller wants the user to see.
pub trait TimelineView: Send + Sync {
    fn notify(&self, notice: &Notice);

    /// Called after every applied event with the resulting state.
    fn state_changed(&self, _state: &AppState) {}
}

/// Prints notices to stdout and re-renders the timeline whenever its
/// collection changes. Clock ticks alone never trigger output.
pub struct ConsoleView {
    last_revision: AtomicU64,
}

impl ConsoleView {
    pub fn new() -> Self {
        Self {
            last_revision: AtomicU64::new(0),
        }
    }
}

impl Default for ConsoleView {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineView for ConsoleView {
    fn notify(&self, notice: &Notice) {
        println!("{}", render::render_notice(notice));
    }

    fn state_changed(&self, state: &AppState) {
        let previous = self.last_revision.swap(state.revision, Ordering::Relaxed);
        if previous != state.revision {
            println!("{}", render::render_timeline(&state.timeline));
        }
    }
}
