#![warn(missing_docs)]
//! Portrait Studio - AI portrait makeovers over the Gemini image API.
//!
//! This crate provides a headless UI shell and a transform client for turning
//! an uploaded photo into a professional portrait.
//!
//! # Quick Start - Transform Client
//!
//! ```no_run
//! use portrait_studio::{GeminiTransformer, ImagePayload, Style, TransformRequest, Transformer, Variant};
//!
//! #[tokio::main]
//! async fn main() -> portrait_studio::Result<()> {
//!     let transformer = GeminiTransformer::builder().build();
//!     let photo = ImagePayload::from_file("me.jpg").await?;
//!     let request = TransformRequest::new(photo, Variant::PortraitStudio)
//!         .with_style(Style::SmartCasual);
//!     let portrait = transformer.transform(&request).await?;
//!     std::fs::write("portrait.png", &portrait.bytes)?;
//!     Ok(())
//! }
//! ```
//!
//! # Quick Start - Shell
//!
//! ```no_run
//! use portrait_studio::shell::{Event, ShellRuntime};
//! use portrait_studio::{GeminiTransformer, Style, Variant};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let transformer = Arc::new(GeminiTransformer::builder().build());
//!     let mut runtime = ShellRuntime::new(Variant::PortraitStudio, transformer);
//!     runtime.upload_file("me.jpg").await;
//!     runtime.dispatch(Event::SelectStyle(Style::CreativeStudio));
//!     runtime.dispatch(Event::Transform);
//!     runtime.settle().await;
//!     let view = runtime.shell().view();
//!     if let Some(download) = view.download {
//!         println!("ready: {}", download.file_name);
//!     }
//! }
//! ```
//!
//! # Features
//!
//! - `gemini` (default): the Gemini HTTP client.

mod error;
mod payload;
pub mod prompt;
pub mod shell;
mod style;
pub mod transform;
mod variant;

// Re-export error types at crate root
pub use error::{FailureKind, Result, StudioError};

pub use payload::{ImageFormat, ImagePayload};
pub use style::Style;
pub use transform::{TransformRequest, Transformer};
pub use variant::{Messages, Variant};

#[cfg(feature = "gemini")]
pub use transform::{GeminiModel, GeminiTransformer, GeminiTransformerBuilder};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{FailureKind, Result, StudioError};
    pub use crate::payload::ImagePayload;
    pub use crate::shell::{Event, Phase, Shell, ShellRuntime, ShellView};
    pub use crate::style::Style;
    pub use crate::transform::{TransformRequest, Transformer};
    pub use crate::variant::Variant;

    #[cfg(feature = "gemini")]
    pub use crate::transform::GeminiTransformer;
}
