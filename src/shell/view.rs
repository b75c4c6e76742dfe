//! Render model derived from the shell state.

use crate::error::Result;
use crate::payload::ImagePayload;
use crate::shell::{Phase, Shell};
use crate::style::Style;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// A generated image offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    /// Suggested file name.
    pub file_name: String,
    /// The image exactly as returned by the service.
    pub payload: ImagePayload,
}

impl DownloadArtifact {
    /// Returns the data URL to use as the download link target.
    pub fn href(&self) -> String {
        self.payload.to_data_url()
    }

    /// Writes the image into `dir` under [`Self::file_name`].
    pub async fn save_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        tokio::fs::write(&path, &self.payload.bytes).await?;
        tracing::debug!(path = %path.display(), size = self.payload.size(), "saved portrait");
        Ok(path)
    }
}

/// Progress indicator text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressNotice {
    /// Headline.
    pub title: &'static str,
    /// Detail line.
    pub detail: &'static str,
}

/// One entry of the style selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleOption {
    /// The preset.
    pub style: Style,
    /// True for the current selection.
    pub selected: bool,
}

/// Everything a renderer needs to draw the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellView {
    /// Header title.
    pub title: &'static str,
    /// Current phase.
    pub phase: Phase,
    /// Show the file picker instead of the preview panes.
    pub show_upload: bool,
    /// Original image as a data URL.
    pub original_preview: Option<String>,
    /// Generated image as a data URL.
    pub result_preview: Option<String>,
    /// Style selector entries; empty for variants without presets.
    pub style_options: Vec<StyleOption>,
    /// Whether the style selector accepts input.
    pub style_selector_enabled: bool,
    /// Progress indicator, shown while generating.
    pub progress: Option<ProgressNotice>,
    /// Error banner text.
    pub error_banner: Option<String>,
    /// Transient notice for a rejected action; does not affect the phase.
    pub notice: Option<&'static str>,
    /// Whether the transform control accepts input.
    pub transform_enabled: bool,
    /// Download action, offered once a result exists.
    pub download: Option<DownloadArtifact>,
    /// Whether the reset action is offered.
    pub reset_enabled: bool,
}

impl Shell {
    /// Builds the view, stamping downloads with the local time.
    pub fn view(&self) -> ShellView {
        self.view_at(chrono::Local::now().naive_local())
    }

    /// Builds the view, stamping downloads with `now`.
    pub fn view_at(&self, now: NaiveDateTime) -> ShellView {
        let state = self.state();
        let phase = self.phase();
        let messages = self.variant().messages();
        let has_styles = self.variant().has_styles();

        let style_options = if has_styles {
            Style::ALL
                .into_iter()
                .map(|style| StyleOption {
                    style,
                    selected: style == state.selected_style,
                })
                .collect()
        } else {
            Vec::new()
        };

        ShellView {
            title: self.variant().title(),
            phase,
            show_upload: state.original_image.is_none(),
            original_preview: state.original_image.as_ref().map(ImagePayload::to_data_url),
            result_preview: state.generated_image.as_ref().map(ImagePayload::to_data_url),
            style_options,
            style_selector_enabled: has_styles && !state.is_generating,
            progress: state.is_generating.then_some(ProgressNotice {
                title: messages.progress_title,
                detail: messages.progress_detail,
            }),
            error_banner: state.error.clone(),
            notice: self.notice(),
            transform_enabled: self.session().can_transform(),
            download: self.download_at(now),
            reset_enabled: phase != Phase::Idle || state.error.is_some(),
        }
    }

    /// Returns the download artifact if a result exists.
    pub fn download_at(&self, now: NaiveDateTime) -> Option<DownloadArtifact> {
        let payload = self.state().generated_image.clone()?;
        Some(DownloadArtifact {
            file_name: self.variant().download_file_name(&payload, now),
            payload,
        })
    }
}
