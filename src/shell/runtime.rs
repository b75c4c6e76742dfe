//! Tokio driver for the shell.

use crate::error::StudioError;
use crate::payload::ImagePayload;
use crate::shell::{Command, Event, Phase, Shell};
use crate::transform::Transformer;
use crate::variant::Variant;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Handle for sending events to a [`ShellRuntime`] from UI callbacks.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<Event>,
}

impl EventSender {
    /// Queues an event. Returns false if the runtime is gone.
    pub fn send(&self, event: Event) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Owns a [`Shell`] and executes its commands.
///
/// All events, including transform completions, go through one channel and
/// are applied by whoever drives [`ShellRuntime::next`], so the session is
/// only ever mutated from one place.
pub struct ShellRuntime {
    shell: Shell,
    transformer: Arc<dyn Transformer>,
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
}

impl ShellRuntime {
    /// Creates a runtime for `variant` backed by `transformer`.
    pub fn new(variant: Variant, transformer: Arc<dyn Transformer>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            shell: Shell::new(variant),
            transformer,
            tx,
            rx,
        }
    }

    /// Returns the shell.
    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    /// Returns a sender for queuing events.
    pub fn sender(&self) -> EventSender {
        EventSender {
            tx: self.tx.clone(),
        }
    }

    /// Applies an event immediately and runs any resulting command.
    pub fn dispatch(&mut self, event: Event) {
        if let Some(command) = self.shell.update(event) {
            self.execute(command);
        }
    }

    /// Reads a local file and uploads it.
    pub async fn upload_file(&mut self, path: impl AsRef<Path>) {
        let event = match ImagePayload::from_file(path).await {
            Ok(image) => Event::Upload(image),
            Err(err) => Event::UploadFailed(err),
        };
        self.dispatch(event);
    }

    /// Waits for the next queued event and applies it.
    ///
    /// Never returns `None` while the runtime is alive, since it holds a
    /// sender itself.
    pub async fn next(&mut self) -> Option<Phase> {
        let event = self.rx.recv().await?;
        self.dispatch(event);
        Some(self.shell.phase())
    }

    /// Applies queued events until no transform is outstanding.
    pub async fn settle(&mut self) -> Phase {
        while self.shell.state().is_generating {
            if self.next().await.is_none() {
                break;
            }
        }
        self.shell.phase()
    }

    fn execute(&self, command: Command) {
        match command {
            Command::Generate(ticket) => {
                let transformer = Arc::clone(&self.transformer);
                let tx = self.tx.clone();
                tracing::debug!(
                    epoch = ticket.epoch,
                    transformer = transformer.name(),
                    "dispatching transform"
                );
                tokio::spawn(async move {
                    let epoch = ticket.epoch;
                    let task =
                        tokio::spawn(async move { transformer.transform(&ticket.request).await });
                    // A panicking transformer still has to release the session.
                    let outcome = task.await.unwrap_or_else(|e| {
                        tracing::warn!(epoch, "transform task failed: {e}");
                        Err(StudioError::Aborted(e.to_string()))
                    });
                    // The runtime may have been dropped meanwhile.
                    let _ = tx.send(Event::Completed {
                        epoch,
                        outcome,
                    });
                });
            }
        }
    }
}
