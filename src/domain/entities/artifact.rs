//! Cached thumbnail artifacts.

use super::SourceImageId;

/// Encoded thumbnail as it is kept by an artifact store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredPayload {
    /// Data URI, possibly sentinel-substituted.
    Text(String),
    /// Raw bytes as read from or written to a file.
    Binary(Vec<u8>),
}

impl StoredPayload {
    /// Returns the payload as bytes, regardless of representation.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }

    /// Returns the stored size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Returns true if the payload holds no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Dominant color of a source image, six lowercase hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexColor(String);

impl HexColor {
    /// Parses six hex digits, with or without a leading `#`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let digits = value.trim().trim_start_matches('#');
        (digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()))
            .then(|| Self(digits.to_ascii_lowercase()))
    }

    /// Builds a color from its channels.
    #[must_use]
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(hex::encode([r, g, b]))
    }

    /// Returns the six hex digits as stored.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.0
    }

    /// Returns the CSS form, `#rrggbb`.
    #[must_use]
    pub fn to_css(&self) -> String {
        format!("#{}", self.0)
    }
}

impl std::fmt::Display for HexColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything cached for one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CachedArtifact {
    /// Source image the payload was derived from.
    pub source_image_id: Option<SourceImageId>,
    /// Stored thumbnail payload.
    pub payload: Option<StoredPayload>,
    /// Stored dominant color.
    pub color: Option<HexColor>,
}

impl CachedArtifact {
    /// Returns true if the payload was derived from `current`.
    #[must_use]
    pub fn is_fresh_for(&self, current: SourceImageId) -> bool {
        self.payload.is_some() && self.source_image_id == Some(current)
    }
}
