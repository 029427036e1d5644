//! Port definition for the image renderer.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::entities::HexColor;
use crate::domain::errors::RenderError;

/// Output format of a rendered thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThumbnailFormat {
    /// JPEG, the only format honoring the quality setting.
    Jpeg,
    /// PNG.
    Png,
    /// WebP.
    Webp,
}

impl ThumbnailFormat {
    /// Picks the format matching a source file's extension.
    ///
    /// # Errors
    /// Returns `UnsupportedFormat` for anything else.
    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::Webp),
            _ => Err(RenderError::UnsupportedFormat { extension }),
        }
    }

    /// Returns the MIME type used in data URIs.
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    /// Returns the file extension for temporary output.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }
}

/// Parameters of one thumbnail render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderRequest {
    /// Square edge in pixels; the source is cropped to fill it.
    pub size: u32,
    /// JPEG quality (0-100).
    pub quality: u8,
    /// Output format.
    pub format: ThumbnailFormat,
}

/// Resizes images and inspects their colors.
///
/// Implementations must not copy source metadata (EXIF, ICC, comments) into
/// the rendered output.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageRendererPort: Send + Sync {
    /// Renders `source` according to `request` and writes it to `output`.
    async fn render(
        &self,
        source: &Path,
        request: &RenderRequest,
        output: &Path,
    ) -> Result<(), RenderError>;

    /// Returns the most common color of `source`.
    async fn dominant_color(&self, source: &Path) -> Result<HexColor, RenderError>;

    /// Writes the bundled reference image, as a JPEG, to `output`.
    async fn write_reference_image(&self, output: &Path) -> Result<(), RenderError>;
}
