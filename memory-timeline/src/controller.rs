//! Single-writer controller for the application state.
//!
//! Every mutation arrives as a [`Command`] on one unbounded channel and is
//! applied by one background task, so the state needs no lock. Network calls
//! run on their own tasks and report back through the same channel; they all
//! race the controller's cancellation token, so nothing lands after shutdown.

use crate::integrations::MemoryBackend;
use crate::timeline::{reduce, AppEvent, AppState, DraftMemory, Effect, PhotoRef};
use crate::view::TimelineView;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

enum Command {
    /// Apply an event to the state.
    Dispatch(AppEvent),
    /// Reply with a copy of the current state.
    Snapshot(oneshot::Sender<AppState>),
}

/// Cheap cloneable sender for the clock, the console and spawned requests.
#[derive(Clone)]
pub struct ControllerHandle {
    cmd_tx: mpsc::UnboundedSender<Command>,
}

impl ControllerHandle {
    /// Queue an event. Returns immediately; ignored after shutdown.
    pub fn dispatch(&self, event: AppEvent) {
        let _ = self.cmd_tx.send(Command::Dispatch(event));
    }

    /// Current state, or `None` once the controller has stopped.
    pub async fn snapshot(&self) -> Option<AppState> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx.send(Command::Snapshot(tx)).ok()?;
        rx.await.ok()
    }
}

pub struct TimelineController {
    handle: ControllerHandle,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl TimelineController {
    /// Spawn the controller task with an empty state.
    pub fn spawn(backend: Arc<dyn MemoryBackend>, view: Arc<dyn TimelineView>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let handle = ControllerHandle { cmd_tx };
        let cancel = CancellationToken::new();

        let runner = Runner {
            backend,
            view,
            handle: handle.clone(),
            cancel: cancel.clone(),
        };
        let task = tokio::spawn(runner.run_loop(cmd_rx));

        Self {
            handle,
            cancel,
            task: Some(task),
        }
    }

    pub fn handle(&self) -> ControllerHandle {
        self.handle.clone()
    }

    pub fn dispatch(&self, event: AppEvent) {
        self.handle.dispatch(event);
    }

    /// Cancel in-flight requests, stop the loop and wait for it.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                log::warn!("[TIMELINE] Controller task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for TimelineController {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct Runner {
    backend: Arc<dyn MemoryBackend>,
    view: Arc<dyn TimelineView>,
    handle: ControllerHandle,
    cancel: CancellationToken,
}

impl Runner {
    async fn run_loop(self, mut cmd_rx: mpsc::UnboundedReceiver<Command>) {
        let mut state = AppState::default();

        loop {
            let cmd = tokio::select! {
                _ = self.cancel.cancelled() => break,
                cmd = cmd_rx.recv() => match cmd {
                    Some(cmd) => cmd,
                    None => break,
                },
            };

            match cmd {
                Command::Dispatch(event) => {
                    let step = reduce(std::mem::take(&mut state), event);
                    state = step.state;
                    self.view.state_changed(&state);
                    for effect in step.effects {
                        self.execute(effect);
                    }
                }
                Command::Snapshot(reply) => {
                    let _ = reply.send(state.clone());
                }
            }
        }

        log::info!("[TIMELINE] Controller loop shutting down");
    }

    fn execute(&self, effect: Effect) {
        match effect {
            Effect::Notify(notice) => self.view.notify(&notice),
            Effect::Load { issued_at } => {
                let backend = self.backend.clone();
                self.spawn_request(async move {
                    match backend.list_memories().await {
                        Ok(records) => {
                            log::info!("[TIMELINE] Fetched {} memories", records.len());
                            AppEvent::Loaded { issued_at, records }
                        }
                        Err(e) => {
                            log::error!("[TIMELINE] Error fetching memories: {}", e);
                            AppEvent::LoadFailed(e.to_string())
                        }
                    }
                });
            }
            Effect::Save(draft) => {
                let backend = self.backend.clone();
                self.spawn_request(save_draft(backend, draft));
            }
        }
    }

    /// Run `request` on its own task and feed its resulting event back in,
    /// unless the controller is cancelled first.
    fn spawn_request<F>(&self, request: F)
    where
        F: std::future::Future<Output = AppEvent> + Send + 'static,
    {
        let handle = self.handle.clone();
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    log::debug!("[TIMELINE] Dropping in-flight request on shutdown");
                }
                event = request => handle.dispatch(event),
            }
        });
    }
}

/// Upload a pending photo if there is one, then create or update the record.
///
/// An upload failure returns before any record write is attempted.
async fn save_draft(backend: Arc<dyn MemoryBackend>, draft: DraftMemory) -> AppEvent {
    let photo_url = match &draft.photo {
        PhotoRef::Remote(url) => url.clone(),
        PhotoRef::Pending(upload) => {
            let bytes = match tokio::fs::read(&upload.path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    log::error!(
                        "[TIMELINE] Upload error: cannot read {}: {}",
                        upload.path.display(),
                        e
                    );
                    return AppEvent::UploadFailed(e.to_string());
                }
            };
            match backend.upload_image(&upload.file_name, bytes).await {
                Ok(url) => url,
                Err(e) => {
                    log::error!("[TIMELINE] Upload error: {}", e);
                    return AppEvent::UploadFailed(e.to_string());
                }
            }
        }
    };

    let payload = draft.to_payload(photo_url);
    match draft.editing {
        Some(id) => match backend.update_memory(&id, &payload).await {
            Ok(record) => AppEvent::Updated { id, record },
            Err(e) => {
                log::error!("[TIMELINE] Save error (update {}): {}", id, e);
                AppEvent::SaveFailed(e.to_string())
            }
        },
        None => match backend.create_memory(&payload).await {
            Ok(record) => AppEvent::Created(record),
            Err(e) => {
                log::error!("[TIMELINE] Save error (create): {}", e);
                AppEvent::SaveFailed(e.to_string())
            }
        },
    }
}
