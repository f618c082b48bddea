//! Application state and its pure transition function.
//!
//! `reduce` never performs I/O. Anything that has to happen outside the state
//! (network calls, notices) is returned as an [`Effect`] for the controller to
//! carry out.

use super::draft::{DraftField, DraftMemory, PendingUpload};
use super::order::{self, ReplaceOutcome};
use crate::view::Notice;
use memory_timeline_types::MemoryRecord;

pub const MSG_LOAD_FAILED: &str = "Failed to fetch memories from backend";
pub const MSG_UPLOAD_FAILED: &str = "Failed to upload image.";
pub const MSG_SAVE_FAILED: &str = "Failed to save memory.";
pub const MSG_ADDED: &str = "Memory added!";
pub const MSG_UPDATED: &str = "Memory updated!";

#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Always sorted newest first
    pub timeline: Vec<MemoryRecord>,
    /// `Some` while the form is open
    pub form: Option<DraftMemory>,
    /// A submit is in flight
    pub saving: bool,
    pub live_time: String,
    /// Bumped every time `timeline` changes
    pub revision: u64,
    /// Bumped by every create or update applied locally. A list fetched
    /// before the latest write may not contain it.
    pub writes: u64,
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    LoadRequested,
    /// `issued_at` is the `writes` count when the fetch was started
    Loaded {
        issued_at: u64,
        records: Vec<MemoryRecord>,
    },
    LoadFailed(String),

    /// The "add memory" button: opens a blank form, or closes an open one
    FormToggled,
    EditRequested(String),
    FieldChanged(DraftField, String),
    FileSelected(PendingUpload),
    FormClosed,

    SubmitRequested,
    UploadFailed(String),
    Created(MemoryRecord),
    Updated { id: String, record: MemoryRecord },
    SaveFailed(String),

    Tick(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Notify(Notice),
    /// Fetch the full collection, tagged with the current `writes` count
    Load { issued_at: u64 },
    /// Upload (if needed) then create or update
    Save(DraftMemory),
}

/// Next state plus the effects the transition asks for
#[derive(Debug)]
pub struct Step {
    pub state: AppState,
    pub effects: Vec<Effect>,
}

impl Step {
    fn new(state: AppState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn with(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

pub fn reduce(mut state: AppState, event: AppEvent) -> Step {
    match event {
        AppEvent::LoadRequested => load(state),
        AppEvent::Loaded { issued_at, .. } if issued_at != state.writes => {
            log::debug!(
                "[TIMELINE] Discarding list fetched at write {} (now {}), refetching",
                issued_at,
                state.writes
            );
            load(state)
        }
        AppEvent::Loaded { mut records, .. } => {
            order::sort_by_date_desc(&mut records);
            state.timeline = records;
            state.revision += 1;
            Step::new(state)
        }
        AppEvent::LoadFailed(_) => Step::new(state).with(Effect::Notify(Notice::failure(MSG_LOAD_FAILED))),

        AppEvent::FormToggled
        | AppEvent::EditRequested(_)
        | AppEvent::FieldChanged(..)
        | AppEvent::FileSelected(_)
        | AppEvent::FormClosed
            if state.saving =>
        {
            Step::new(state).with(Effect::Notify(Notice::info(
                "A save is in progress, wait for it to finish",
            )))
        }
        AppEvent::FormToggled => {
            state.form = match state.form {
                Some(_) => None,
                None => Some(DraftMemory::default()),
            };
            Step::new(state)
        }
        AppEvent::EditRequested(id) => {
            let draft = state
                .timeline
                .iter()
                .find(|r| r.id == id)
                .map(DraftMemory::from_record);
            match draft {
                Some(draft) => {
                    state.form = Some(draft);
                    Step::new(state)
                }
                None => Step::new(state)
                    .with(Effect::Notify(Notice::failure(format!("No memory with id {}", id)))),
            }
        }
        AppEvent::FieldChanged(field, value) => match state.form.as_mut() {
            Some(draft) => {
                draft.set_field(field, value);
                Step::new(state)
            }
            None => form_closed(state),
        },
        AppEvent::FileSelected(upload) => match state.form.as_mut() {
            Some(draft) => {
                draft.select_file(&upload.path);
                Step::new(state)
            }
            None => form_closed(state),
        },
        AppEvent::FormClosed => {
            state.form = None;
            Step::new(state)
        }

        AppEvent::SubmitRequested => {
            if state.saving {
                return Step::new(state)
                    .with(Effect::Notify(Notice::info("A save is already in progress")));
            }
            let Some(draft) = state.form.clone() else {
                return form_closed(state);
            };
            let missing = draft.missing_required();
            if !missing.is_empty() {
                let names: Vec<&str> = missing.iter().map(|f| f.as_str()).collect();
                return Step::new(state).with(Effect::Notify(Notice::failure(format!(
                    "Please fill in: {}",
                    names.join(", ")
                ))));
            }
            state.saving = true;
            Step::new(state).with(Effect::Save(draft))
        }
        AppEvent::UploadFailed(_) => {
            state.saving = false;
            Step::new(state).with(Effect::Notify(Notice::failure(MSG_UPLOAD_FAILED)))
        }
        AppEvent::SaveFailed(_) => {
            state.saving = false;
            Step::new(state).with(Effect::Notify(Notice::failure(MSG_SAVE_FAILED)))
        }
        AppEvent::Created(record) => {
            state.saving = false;
            order::insert_created(&mut state.timeline, record);
            state.revision += 1;
            state.writes += 1;
            state.form = None;
            Step::new(state).with(Effect::Notify(Notice::success(MSG_ADDED)))
        }
        AppEvent::Updated { id, record } => {
            state.saving = false;
            state.form = None;
            match order::replace_updated(&mut state.timeline, &id, record) {
                ReplaceOutcome::Replaced => {
                    state.revision += 1;
                    state.writes += 1;
                    Step::new(state).with(Effect::Notify(Notice::success(MSG_UPDATED)))
                }
                // The backend changed but our copy has no such element;
                // reconcile from the source of truth.
                ReplaceOutcome::NotFound => {
                    let issued_at = state.writes;
                    Step::new(state)
                        .with(Effect::Notify(Notice::success(MSG_UPDATED)))
                        .with(Effect::Load { issued_at })
                }
            }
        }

        AppEvent::Tick(live_time) => {
            state.live_time = live_time;
            Step::new(state)
        }
    }
}

fn load(state: AppState) -> Step {
    let issued_at = state.writes;
    Step::new(state).with(Effect::Load { issued_at })
}

fn form_closed(state: AppState) -> Step {
    Step::new(state).with(Effect::Notify(Notice::info("Open the form first (add or edit)")))
}
