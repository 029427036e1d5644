//! Thumbnail renderer built on the `image` crate.
//!
//! Decoding and encoding are CPU-bound and run on the blocking pool.

use std::io::Cursor;
use std::path::Path;

use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageFormat, Rgb, RgbImage};
use tracing::{debug, trace};

use super::color::most_common_color;
use crate::domain::entities::HexColor;
use crate::domain::errors::RenderError;
use crate::domain::ports::{ImageRendererPort, RenderRequest, ThumbnailFormat};

/// Edge of the generated reference image.
const REFERENCE_EDGE: u32 = 64;

/// Quality the reference image is saved at before it is re-rendered.
const REFERENCE_QUALITY: u8 = 90;

/// Renders square thumbnails by cropping the source to fill.
///
/// Only pixels are re-encoded, so EXIF, ICC profiles, and comments of the
/// source never reach the output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateRenderer;

impl ImageCrateRenderer {
    /// Creates a renderer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ImageRendererPort for ImageCrateRenderer {
    async fn render(
        &self,
        source: &Path,
        request: &RenderRequest,
        output: &Path,
    ) -> Result<(), RenderError> {
        let source = source.to_path_buf();
        let output = output.to_path_buf();
        let request = *request;

        blocking(move || {
            let img = open(&source)?;
            let thumb = img.resize_to_fill(request.size, request.size, FilterType::Lanczos3);
            let bytes = encode(&thumb, request.format, request.quality)?;
            std::fs::write(&output, &bytes)?;
            trace!(
                source = %source.display(),
                size = request.size,
                bytes = bytes.len(),
                "Rendered thumbnail"
            );
            Ok(())
        })
        .await
    }

    async fn dominant_color(&self, source: &Path) -> Result<HexColor, RenderError> {
        let source = source.to_path_buf();
        blocking(move || {
            let img = open(&source)?;
            most_common_color(&img).ok_or(RenderError::NoColor)
        })
        .await
    }

    async fn write_reference_image(&self, output: &Path) -> Result<(), RenderError> {
        let output = output.to_path_buf();
        blocking(move || {
            let bytes = encode(&reference_image(), ThumbnailFormat::Jpeg, REFERENCE_QUALITY)?;
            std::fs::write(&output, bytes)?;
            debug!(path = %output.display(), "Wrote reference image");
            Ok(())
        })
        .await
    }
}

async fn blocking<T, F>(task: F) -> Result<T, RenderError>
where
    F: FnOnce() -> Result<T, RenderError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| RenderError::TaskFailed {
            message: e.to_string(),
        })?
}

fn open(path: &Path) -> Result<DynamicImage, RenderError> {
    image::open(path).map_err(|e| RenderError::unreadable(path, e.to_string()))
}

fn encode(
    img: &DynamicImage,
    format: ThumbnailFormat,
    quality: u8,
) -> Result<Vec<u8>, RenderError> {
    let mut buf = Vec::new();
    match format {
        ThumbnailFormat::Jpeg => {
            let rgb = img.to_rgb8();
            let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
            encoder
                .encode(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
                .map_err(|e| RenderError::encode_failed(e.to_string()))?;
        }
        ThumbnailFormat::Png => write_as(img, &mut buf, ImageFormat::Png)?,
        ThumbnailFormat::Webp => {
            let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
            write_as(&rgba, &mut buf, ImageFormat::WebP)?;
        }
    }
    Ok(buf)
}

fn write_as(img: &DynamicImage, buf: &mut Vec<u8>, format: ImageFormat) -> Result<(), RenderError> {
    img.write_to(&mut Cursor::new(buf), format)
        .map_err(|e| RenderError::encode_failed(e.to_string()))
}

/// Diagonal gradient, deterministic so the derived prefix is stable.
fn reference_image() -> DynamicImage {
    let edge = REFERENCE_EDGE;
    let img = RgbImage::from_fn(edge, edge, |x, y| {
        let scale = |v: u32| u8::try_from(v * 255 / (edge - 1)).unwrap_or(u8::MAX);
        Rgb([scale(x), scale(y), scale((x + y) / 2)])
    });
    DynamicImage::ImageRgb8(img)
}
