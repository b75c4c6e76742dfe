//! Transform client: one outbound call that restyles a portrait.

#[cfg(feature = "gemini")]
mod gemini;
mod transformer;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiModel, GeminiTransformer, GeminiTransformerBuilder};
pub use transformer::{TransformRequest, Transformer};
