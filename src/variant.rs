//! Product variants and their user-facing text.

use crate::error::FailureKind;
use crate::payload::ImagePayload;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Which product the shell is running as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Single fixed prompt; uploading starts the transform right away.
    StartupPersona,
    /// Three selectable style presets; the user starts the transform.
    #[default]
    PortraitStudio,
}

/// Localized strings for one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    /// Banner shown when an upload cannot be decoded.
    pub decode_failure: &'static str,
    /// Banner shown when the service call fails.
    pub transport_failure: &'static str,
    /// Banner shown when the service returns no image.
    pub no_image_returned: &'static str,
    /// Banner shown for an unknown style selector.
    pub invalid_style: &'static str,
    /// Headline of the progress indicator.
    pub progress_title: &'static str,
    /// Detail line of the progress indicator.
    pub progress_detail: &'static str,
}

impl Messages {
    /// Returns the banner text for a failure class.
    pub fn for_failure(&self, kind: FailureKind) -> &'static str {
        match kind {
            FailureKind::DecodeFailure => self.decode_failure,
            FailureKind::TransportFailure => self.transport_failure,
            FailureKind::NoImageReturned => self.no_image_returned,
            FailureKind::InvalidStyle => self.invalid_style,
        }
    }
}

const PERSONA_MESSAGES: Messages = Messages {
    decode_failure: "사진을 불러오지 못했습니다. 다른 이미지 파일을 선택해 주세요.",
    transport_failure: "처리 중 오류가 발생했습니다. 얼굴이 잘 보이는 사진을 사용해 주세요.",
    no_image_returned: "이미지를 생성하지 못했습니다. 다시 시도해 주세요.",
    invalid_style: "지원하지 않는 스타일입니다.",
    progress_title: "인공지능이 변신 중...",
    progress_detail: "배경과 의상을 스마트하게 변경하고 있습니다.",
};

const STUDIO_MESSAGES: Messages = Messages {
    decode_failure: "We couldn't read that file. Please choose a JPG, PNG, WebP or GIF image.",
    transport_failure: "Failed to generate portrait. Please try again with a clear photo of your face.",
    no_image_returned: "The model did not return an image. Please try again.",
    invalid_style: "Unknown style preset. Please pick one of the listed styles.",
    progress_title: "Creating your professional portrait...",
    progress_detail: "Adjusting wardrobe, lighting and background.",
};

const PERSONA_FILE_NAME: &str = "persona_startup_profile.png";
const STUDIO_FILE_PREFIX: &str = "professional_portrait";

impl Variant {
    /// Returns the product name shown in the header.
    pub fn title(&self) -> &'static str {
        match self {
            Self::StartupPersona => "Startup Persona",
            Self::PortraitStudio => "Professional Portrait Studio",
        }
    }

    /// Returns true if the user picks a style preset before generating.
    pub fn has_styles(&self) -> bool {
        matches!(self, Self::PortraitStudio)
    }

    /// Returns true if a successful upload starts the transform immediately.
    pub fn transforms_on_upload(&self) -> bool {
        matches!(self, Self::StartupPersona)
    }

    /// Returns the localized strings for this variant.
    pub fn messages(&self) -> &'static Messages {
        match self {
            Self::StartupPersona => &PERSONA_MESSAGES,
            Self::PortraitStudio => &STUDIO_MESSAGES,
        }
    }

    /// Returns the download file name for a generated image.
    pub fn download_file_name(&self, payload: &ImagePayload, at: NaiveDateTime) -> String {
        match self {
            Self::StartupPersona => PERSONA_FILE_NAME.to_string(),
            Self::PortraitStudio => format!(
                "{}_{}.{}",
                STUDIO_FILE_PREFIX,
                at.format("%Y%m%d-%H%M%S"),
                extension_for(payload)
            ),
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

fn extension_for(payload: &ImagePayload) -> String {
    if let Some(format) = payload.format() {
        return format.extension().to_string();
    }
    // Fall back to the media subtype, e.g. "image/heic" -> "heic".
    payload
        .media_type
        .split_once('/')
        .map(|(_, sub)| sub.to_ascii_lowercase())
        .filter(|sub| !sub.is_empty() && sub.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "png".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap()
    }

    #[test]
    fn test_persona_file_name_is_fixed() {
        let payload = ImagePayload::new(vec![1, 2, 3], "image/jpeg");
        assert_eq!(
            Variant::StartupPersona.download_file_name(&payload, at()),
            "persona_startup_profile.png"
        );
    }

    #[test]
    fn test_studio_file_name_has_timestamp_and_extension() {
        let png = ImagePayload::new(vec![1], "image/png");
        assert_eq!(
            Variant::PortraitStudio.download_file_name(&png, at()),
            "professional_portrait_20240309-140507.png"
        );

        let jpeg = ImagePayload::new(vec![1], "image/jpeg");
        assert_eq!(
            Variant::PortraitStudio.download_file_name(&jpeg, at()),
            "professional_portrait_20240309-140507.jpg"
        );

        let heic = ImagePayload::new(vec![1], "image/heic");
        assert!(Variant::PortraitStudio
            .download_file_name(&heic, at())
            .ends_with(".heic"));

        let odd = ImagePayload::new(vec![1], "image/svg+xml");
        assert!(Variant::PortraitStudio
            .download_file_name(&odd, at())
            .ends_with(".png"));
    }

    #[test]
    fn test_variant_flags() {
        assert!(Variant::StartupPersona.transforms_on_upload());
        assert!(!Variant::StartupPersona.has_styles());
        assert!(Variant::PortraitStudio.has_styles());
        assert!(!Variant::PortraitStudio.transforms_on_upload());
    }

    #[test]
    fn test_messages_are_distinct_per_failure() {
        let m = Variant::PortraitStudio.messages();
        assert_ne!(
            m.for_failure(FailureKind::TransportFailure),
            m.for_failure(FailureKind::NoImageReturned)
        );
        assert_eq!(
            Variant::StartupPersona
                .messages()
                .for_failure(FailureKind::NoImageReturned),
            "이미지를 생성하지 못했습니다. 다시 시도해 주세요."
        );
    }
}
