//! Wardrobe and lighting presets for the portrait studio.

use crate::error::StudioError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A style preset selectable before generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Style {
    /// Dark business suit, light grey studio backdrop.
    #[default]
    #[serde(rename = "Business Formal")]
    BusinessFormal,
    /// Polo, sweater or casual blazer, warm neutral backdrop.
    #[serde(rename = "Smart Casual")]
    SmartCasual,
    /// Modern look with dynamic lighting, deep blue or textured grey backdrop.
    #[serde(rename = "Creative Studio")]
    CreativeStudio,
}

impl Style {
    /// All presets in display order.
    pub const ALL: [Style; 3] = [Self::BusinessFormal, Self::SmartCasual, Self::CreativeStudio];

    /// Returns the display name, which is also the selector value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BusinessFormal => "Business Formal",
            Self::SmartCasual => "Smart Casual",
            Self::CreativeStudio => "Creative Studio",
        }
    }

    /// Returns the clothing and lighting instruction for this preset.
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::BusinessFormal => {
                "The person should be wearing a high-end dark business suit with a crisp white \
                 shirt and tie (if applicable) or a professional blazer. Professional studio \
                 lighting with a clean, solid light grey background."
            }
            Self::SmartCasual => {
                "The person should be wearing a neat polo shirt, a sweater, or a casual blazer \
                 without a tie. Soft, natural studio lighting with a warm neutral background."
            }
            Self::CreativeStudio => {
                "A modern, stylish professional look. Slightly more dynamic lighting and a \
                 sophisticated deep blue or textured grey studio background."
            }
        }
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Style {
    type Err = StudioError;

    /// Parses an exact display name. Anything else is an error, never a default.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| StudioError::InvalidStyle(s.to_string()))
    }
}
