//! Session state owned by the shell.

use crate::payload::ImagePayload;
use crate::style::Style;

/// Where the session is in the upload → generate → result flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No image loaded.
    Idle,
    /// Image loaded, not generated yet.
    Loaded,
    /// A transform is outstanding.
    Generating,
    /// A generated image is available.
    Done,
    /// The last attempt failed.
    Failed,
}

/// Comparable snapshot of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// The uploaded portrait.
    pub original_image: Option<ImagePayload>,
    /// The transformed portrait.
    pub generated_image: Option<ImagePayload>,
    /// True while a transform is outstanding.
    pub is_generating: bool,
    /// User-visible error message.
    pub error: Option<String>,
    /// Selected preset (studio variant).
    pub selected_style: Style,
}

/// Session state plus the epoch used to discard stale completions.
///
/// The epoch increases on every reset and every generation attempt. A
/// completion is applied only if it carries the current epoch.
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
    epoch: u64,
}

impl Session {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current snapshot.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns the current epoch.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Derives the phase from the fields.
    pub fn phase(&self) -> Phase {
        let s = &self.state;
        if s.is_generating {
            Phase::Generating
        } else if s.generated_image.is_some() {
            Phase::Done
        } else if s.original_image.is_none() {
            Phase::Idle
        } else if s.error.is_some() {
            Phase::Failed
        } else {
            Phase::Loaded
        }
    }

    /// Returns true if a transform may start now.
    pub fn can_transform(&self) -> bool {
        !self.state.is_generating && self.state.original_image.is_some()
    }

    pub(crate) fn load(&mut self, image: ImagePayload) {
        self.state.original_image = Some(image);
        self.state.generated_image = None;
        self.state.error = None;
    }

    pub(crate) fn reject_upload(&mut self, message: &str) {
        self.state.original_image = None;
        self.state.generated_image = None;
        self.state.error = Some(message.to_string());
    }

    pub(crate) fn select_style(&mut self, style: Style) {
        self.state.selected_style = style;
    }

    /// Starts an attempt and returns its epoch, or `None` if not allowed.
    pub(crate) fn begin(&mut self) -> Option<u64> {
        if !self.can_transform() {
            return None;
        }
        self.epoch += 1;
        self.state.error = None;
        self.state.generated_image = None;
        self.state.is_generating = true;
        Some(self.epoch)
    }

    /// Returns true if a completion tagged with `epoch` should be applied.
    pub(crate) fn is_current(&self, epoch: u64) -> bool {
        self.state.is_generating && epoch == self.epoch
    }

    pub(crate) fn succeed(&mut self, image: ImagePayload) {
        self.state.is_generating = false;
        self.state.generated_image = Some(image);
        self.state.error = None;
    }

    pub(crate) fn fail(&mut self, message: &str) {
        self.state.is_generating = false;
        self.state.generated_image = None;
        self.state.error = Some(message.to_string());
    }

    pub(crate) fn reset(&mut self) {
        self.epoch += 1;
        self.state = SessionState::default();
    }
}
