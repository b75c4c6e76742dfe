//! Transformer trait and request type.

use crate::error::Result;
use crate::payload::ImagePayload;
use crate::style::Style;
use crate::variant::Variant;
use async_trait::async_trait;

/// A request to transform one portrait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRequest {
    /// The uploaded portrait, envelope already stripped.
    pub image: ImagePayload,
    /// Which product prompt to use.
    pub variant: Variant,
    /// Raw style selector as delivered by the UI.
    ///
    /// Validated by the transformer before any network I/O.
    pub style: Option<String>,
}

impl TransformRequest {
    /// Creates a request with no style selector.
    pub fn new(image: ImagePayload, variant: Variant) -> Self {
        Self {
            image,
            variant,
            style: None,
        }
    }

    /// Selects one of the presets.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style.as_str().to_string());
        self
    }

    /// Sets a raw, unvalidated style selector.
    pub fn with_style_selector(mut self, selector: impl Into<String>) -> Self {
        self.style = Some(selector.into());
        self
    }

    /// Builds the instruction text for this request.
    pub fn instruction(&self) -> Result<String> {
        crate::prompt::instruction(self.variant, self.style.as_deref())
    }
}

/// Something that turns a portrait into a restyled portrait.
#[async_trait]
pub trait Transformer: Send + Sync {
    /// Transforms the portrait in `request`.
    ///
    /// Issues at most one outbound call and never retries.
    async fn transform(&self, request: &TransformRequest) -> Result<ImagePayload>;

    /// Returns the name of this transformer for display.
    fn name(&self) -> &str;

    /// Checks if the backing service is reachable and authenticated.
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
