//! Thumbnail generation settings.

use serde::{Deserialize, Serialize};

/// Default square edge of generated thumbnails, in pixels.
pub const DEFAULT_IMAGE_SIZE: u32 = 40;

/// Default JPEG quality of generated thumbnails.
pub const DEFAULT_JPEG_QUALITY: u8 = 30;

const ANY_KIND: &str = "any";

/// Which entity kinds get thumbnails.
///
/// Serialized the way hosts usually configure it: the string `"any"`, a single
/// kind as a string, or a list of kinds.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawPostTypes", into = "RawPostTypes")]
pub enum PostTypeFilter {
    /// Every kind is enabled.
    #[default]
    Any,
    /// Only this kind is enabled. `One("any")` behaves like [`Self::Any`].
    One(String),
    /// Only the listed kinds are enabled.
    List(Vec<String>),
}

impl PostTypeFilter {
    /// Returns true if thumbnails are enabled for `kind`.
    #[must_use]
    pub fn allows(&self, kind: &str) -> bool {
        match self {
            Self::Any => true,
            Self::One(only) => only == ANY_KIND || only == kind,
            Self::List(kinds) => kinds.iter().any(|k| k == kind),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawPostTypes {
    One(String),
    List(Vec<String>),
}

impl From<RawPostTypes> for PostTypeFilter {
    fn from(raw: RawPostTypes) -> Self {
        match raw {
            RawPostTypes::One(kind) if kind == ANY_KIND => Self::Any,
            RawPostTypes::One(kind) => Self::One(kind),
            RawPostTypes::List(kinds) => Self::List(kinds),
        }
    }
}

impl From<PostTypeFilter> for RawPostTypes {
    fn from(filter: PostTypeFilter) -> Self {
        match filter {
            PostTypeFilter::Any => Self::One(ANY_KIND.to_string()),
            PostTypeFilter::One(kind) => Self::One(kind),
            PostTypeFilter::List(kinds) => Self::List(kinds),
        }
    }
}

/// Parameters that shape every generated artifact.
///
/// Any change to these invalidates all cached artifacts, see
/// [`SettingsFingerprint`](crate::application::services::SettingsFingerprint).
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Square edge of the thumbnail, in pixels.
    #[serde(default = "default_image_size")]
    pub image_size: u32,

    /// JPEG quality (0-100), ignored for other formats.
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    /// Entity kinds that get thumbnails.
    #[serde(default)]
    pub post_types: PostTypeFilter,

    /// Apply sentinel substitution, and deflate when caching in files.
    #[serde(default = "default_true")]
    pub compress: bool,

    /// Store payloads as files instead of entity metadata.
    #[serde(default)]
    pub cache_in_file: bool,

    /// Generate and store the inline payload.
    #[serde(default = "default_true")]
    pub store_payload: bool,

    /// Extract and store the dominant color.
    #[serde(default)]
    pub store_color: bool,
}

impl GenerationSettings {
    /// Returns the quality clamped to the valid JPEG range.
    #[must_use]
    pub fn effective_quality(&self) -> u8 {
        self.jpeg_quality.min(100)
    }

    /// Returns true if stored payloads are deflated binaries.
    #[must_use]
    pub const fn deflates(&self) -> bool {
        self.compress && self.cache_in_file
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            image_size: DEFAULT_IMAGE_SIZE,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            post_types: PostTypeFilter::Any,
            compress: true,
            cache_in_file: false,
            store_payload: true,
            store_color: false,
        }
    }
}

fn default_image_size() -> u32 {
    DEFAULT_IMAGE_SIZE
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

fn default_true() -> bool {
    true
}
