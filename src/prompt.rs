//! Instruction text sent alongside the portrait.

use crate::error::{Result, StudioError};
use crate::style::Style;
use crate::variant::Variant;

const PERSONA_PROMPT: &str = "\
Transform this person's photo into a polished profile picture for an IT startup team page.
Strictly follow these requirements:
1. KEEP THE PERSON'S FACIAL IDENTITY IDENTICAL. Do not change their ethnic features, facial structure, or expression drastically.
2. CLOTHING: Replace the outfit with a clean, modern business-casual look typical of a tech startup (e.g. a plain knit, an open-collar shirt, or an unstructured blazer).
3. SETTING: Replace the background with a bright, tidy, modern office with soft depth of field.
4. LIGHTING: Soft, natural window light that flatters the face without harsh shadows.
5. COMPOSITION: Centered head-and-shoulders portrait, portrait orientation.
6. Ensure the final result looks like a real photograph, not an illustration.";

/// Builds the studio prompt for one preset.
fn studio_prompt(style: Style) -> String {
    format!(
        "\
Transform this person's photo into a professional, high-quality resume headshot.
Strictly follow these requirements:
1. KEEP THE PERSON'S FACIAL IDENTITY IDENTICAL. Do not change their ethnic features, facial structure, or expression drastically.
2. CLOTHING: {}.
3. SETTING: Professional studio environment. High-end professional camera quality (1K resolution).
4. LIGHTING: Balanced three-point studio lighting to enhance facial features and remove harsh shadows.
5. COMPOSITION: Centered head-and-shoulders portrait.
6. Ensure the final result looks like a real photo taken in a photography studio, not an illustration.",
        style.instruction()
    )
}

/// Returns the instruction for a variant and raw style selector.
///
/// The startup persona has no presets and rejects any selector. The studio
/// uses the default preset when no selector is given and rejects names
/// outside [`Style::ALL`] with [`StudioError::InvalidStyle`].
pub fn instruction(variant: Variant, selector: Option<&str>) -> Result<String> {
    match variant {
        Variant::StartupPersona => match selector {
            None => Ok(PERSONA_PROMPT.to_string()),
            Some(s) => Err(StudioError::InvalidStyle(format!(
                "{s} ({} has no style presets)",
                variant.title()
            ))),
        },
        Variant::PortraitStudio => {
            let style = match selector {
                Some(s) => s.parse::<Style>()?,
                None => Style::default(),
            };
            Ok(studio_prompt(style))
        }
    }
}
