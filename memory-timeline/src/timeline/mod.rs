//! Timeline store: the local, date-ordered view of all memories.

pub mod draft;
pub mod order;
pub mod state;

pub use draft::{DraftField, DraftMemory, PendingUpload, PhotoRef};
pub use state::{reduce, AppEvent, AppState, Effect};
