//! Headless UI shell.
//!
//! [`Shell`] is a reducer: it takes an [`Event`], updates the [`Session`],
//! and may return a [`Command`] for the runtime to execute. Rendering is done
//! from [`Shell::view`], so any front-end can draw the same state.
//!
//! ```text
//! Idle ──upload──▶ Loaded ──transform──▶ Generating ──ok──▶ Done
//!   ▲                                        │
//!   │                                        └──err──▶ Failed
//!   └──────────────── reset (any phase) ─────────────────┘
//! ```

mod runtime;
mod session;
mod view;

pub use runtime::{EventSender, ShellRuntime};
pub use session::{Phase, Session, SessionState};
pub use view::{DownloadArtifact, ProgressNotice, ShellView, StyleOption};

use crate::error::{Result, StudioError};
use crate::payload::ImagePayload;
use crate::style::Style;
use crate::transform::TransformRequest;
use crate::variant::Variant;

/// User actions and completions fed into the shell.
#[derive(Debug)]
pub enum Event {
    /// A decoded image was picked.
    Upload(ImagePayload),
    /// An image was picked as a data URL.
    UploadDataUrl(String),
    /// Reading the picked file failed.
    UploadFailed(StudioError),
    /// Start a transform.
    Transform,
    /// Pick a preset.
    SelectStyle(Style),
    /// Pick a preset by its display name.
    SelectStyleName(String),
    /// Return to the initial state.
    Reset,
    /// A transform finished.
    Completed {
        /// Epoch of the attempt.
        epoch: u64,
        /// Result of the transform.
        outcome: Result<ImagePayload>,
    },
}

/// Side effects requested by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run one transform and report back with [`Event::Completed`].
    Generate(GenerationTicket),
}

/// One generation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTicket {
    /// Epoch the completion must carry.
    pub epoch: u64,
    /// The request to send.
    pub request: TransformRequest,
}

/// Headless shell for one variant.
#[derive(Debug)]
pub struct Shell {
    variant: Variant,
    session: Session,
    notice: Option<&'static str>,
}

impl Shell {
    /// Creates a shell in the `Idle` phase.
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            session: Session::new(),
            notice: None,
        }
    }

    /// Returns the variant.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Returns the session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the session snapshot.
    pub fn state(&self) -> &SessionState {
        self.session.state()
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    /// Returns the transient notice for a rejected user action.
    ///
    /// Unlike [`SessionState::error`] it never changes the phase, and it is
    /// cleared by the next user event.
    pub fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    /// Applies an event.
    pub fn update(&mut self, event: Event) -> Option<Command> {
        if !matches!(event, Event::Completed { .. }) {
            self.notice = None;
        }

        match event {
            Event::Upload(image) => self.upload(Ok(image)),
            Event::UploadDataUrl(url) => self.upload(ImagePayload::from_data_url(&url)),
            Event::UploadFailed(err) => self.upload(Err(err)),
            Event::Transform => self.begin_transform(),
            Event::SelectStyle(style) => {
                self.select_style(style);
                None
            }
            Event::SelectStyleName(name) => {
                match name.parse::<Style>() {
                    Ok(style) => self.select_style(style),
                    Err(err) => {
                        tracing::warn!("rejected style selector: {err}");
                        self.notice = Some(self.variant.messages().invalid_style);
                    }
                }
                None
            }
            Event::Reset => {
                tracing::debug!(phase = ?self.phase(), "session reset");
                self.session.reset();
                None
            }
            Event::Completed { epoch, outcome } => {
                self.complete(epoch, outcome);
                None
            }
        }
    }

    fn upload(&mut self, image: Result<ImagePayload>) -> Option<Command> {
        if self.session.state().is_generating {
            tracing::debug!("upload ignored while generating");
            return None;
        }

        match image.and_then(validate_upload) {
            Ok(image) => {
                tracing::debug!(
                    media_type = %image.media_type,
                    size = image.size(),
                    "portrait loaded"
                );
                self.session.load(image);
                if self.variant.transforms_on_upload() {
                    self.begin_transform()
                } else {
                    None
                }
            }
            Err(err) => {
                tracing::warn!("could not load portrait: {err}");
                let message = self.variant.messages().for_failure(err.kind());
                if self.session.state().original_image.is_some() {
                    // Keep the portrait already on screen.
                    self.notice = Some(message);
                } else {
                    self.session.reject_upload(message);
                }
                None
            }
        }
    }

    fn begin_transform(&mut self) -> Option<Command> {
        let Some(epoch) = self.session.begin() else {
            tracing::debug!(phase = ?self.phase(), "transform ignored");
            return None;
        };

        let image = self.session.state().original_image.clone()?;
        let mut request = TransformRequest::new(image, self.variant);
        if self.variant.has_styles() {
            request = request.with_style(self.session.state().selected_style);
        }

        tracing::debug!(epoch, variant = %self.variant, "transform started");
        Some(Command::Generate(GenerationTicket { epoch, request }))
    }

    fn select_style(&mut self, style: Style) {
        if self.session.state().is_generating || !self.variant.has_styles() {
            tracing::debug!(%style, "style selection ignored");
            return;
        }
        self.session.select_style(style);
    }

    fn complete(&mut self, epoch: u64, outcome: Result<ImagePayload>) {
        if !self.session.is_current(epoch) {
            tracing::debug!(
                epoch,
                current = self.session.epoch(),
                "discarding stale transform result"
            );
            return;
        }

        match outcome {
            Ok(image) => {
                tracing::debug!(epoch, size = image.size(), "transform succeeded");
                self.session.succeed(image);
            }
            Err(err) => {
                tracing::warn!(epoch, kind = ?err.kind(), "transform failed: {err}");
                self.session
                    .fail(self.variant.messages().for_failure(err.kind()));
            }
        }
    }
}

fn validate_upload(image: ImagePayload) -> Result<ImagePayload> {
    if image.bytes.is_empty() {
        return Err(StudioError::Decode("empty image data".into()));
    }
    if !image.media_type.to_ascii_lowercase().starts_with("image/") {
        return Err(StudioError::Decode(format!(
            "not an image media type: {:?}",
            image.media_type
        )));
    }
    Ok(image)
}
