//! Render pipeline shared by thumbnail generation and prefix regeneration.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::application::services::PayloadCodec;
use crate::domain::entities::{GenerationSettings, HexColor};
use crate::domain::errors::ThumbnailResult;
use crate::domain::ports::{ImageRendererPort, RenderRequest, ThumbnailFormat};

/// Index of the `/`-separated data URI segment used as dictionary prefix.
const PREFIX_SEGMENT: usize = 4;

/// A rendered thumbnail read back from its temporary file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedThumbnail {
    /// MIME type of `bytes`.
    pub mime: &'static str,
    /// Encoded image bytes, metadata stripped.
    pub bytes: Vec<u8>,
}

/// Drives the renderer at the configured size and quality.
#[derive(Clone)]
pub struct ThumbnailPipeline {
    renderer: Arc<dyn ImageRendererPort>,
    size: u32,
    quality: u8,
}

impl ThumbnailPipeline {
    /// Creates a pipeline for the given settings.
    #[must_use]
    pub fn new(renderer: Arc<dyn ImageRendererPort>, settings: &GenerationSettings) -> Self {
        Self {
            renderer,
            size: settings.image_size,
            quality: settings.effective_quality(),
        }
    }

    /// Renders `source` into a scoped temporary file and returns its bytes.
    ///
    /// The temporary file is removed when this returns, whether rendering
    /// succeeded or not.
    ///
    /// # Errors
    /// Returns error if the format is unsupported or rendering fails.
    pub async fn render(&self, source: &Path) -> ThumbnailResult<RenderedThumbnail> {
        let format = ThumbnailFormat::from_path(source)?;
        let request = RenderRequest {
            size: self.size,
            quality: self.quality,
            format,
        };

        let output = tempfile::Builder::new()
            .prefix("tmp-thumb")
            .suffix(&format!(".{}", format.extension()))
            .tempfile()?;

        self.renderer
            .render(source, &request, output.path())
            .await?;
        let bytes = tokio::fs::read(output.path()).await?;

        trace!(source = %source.display(), size = bytes.len(), "Rendered thumbnail");

        Ok(RenderedThumbnail {
            mime: format.mime(),
            bytes,
        })
    }

    /// Returns the dominant color of `source`.
    ///
    /// # Errors
    /// Returns error if the image cannot be read.
    pub async fn dominant_color(&self, source: &Path) -> ThumbnailResult<HexColor> {
        Ok(self.renderer.dominant_color(source).await?)
    }

    /// Renders the bundled reference image and extracts the shared dictionary
    /// prefix from its data URI. Returns `None` if the URI is too short to
    /// have the expected segment.
    ///
    /// # Errors
    /// Returns error if the reference image cannot be written or rendered.
    pub async fn reference_prefix(&self) -> ThumbnailResult<Option<String>> {
        let reference = tempfile::Builder::new()
            .prefix("dbthumb-reference")
            .suffix(".jpg")
            .tempfile()?;

        self.renderer.write_reference_image(reference.path()).await?;
        let rendered = self.render(reference.path()).await?;
        let data_uri = PayloadCodec::to_data_uri(&rendered.bytes, rendered.mime);

        let prefix = data_uri
            .split('/')
            .nth(PREFIX_SEGMENT)
            .filter(|segment| !segment.is_empty())
            .map(ToString::to_string);

        debug!(found = prefix.is_some(), "Extracted dictionary prefix");
        Ok(prefix)
    }
}

impl std::fmt::Debug for ThumbnailPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThumbnailPipeline")
            .field("size", &self.size)
            .field("quality", &self.quality)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{RenderError, ThumbnailError};
    use crate::domain::ports::mocks::MockImageRendererPort;
    use std::path::PathBuf;
    use std::sync::Mutex;

    const FAKE_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];

    fn settings() -> GenerationSettings {
        GenerationSettings::default()
    }

    #[tokio::test]
    async fn test_render_reads_output_and_removes_temp_file() {
        let seen = Arc::new(Mutex::new(None::<PathBuf>));
        let seen_in_mock = seen.clone();

        let mut renderer = MockImageRendererPort::new();
        renderer
            .expect_render()
            .withf(|_, request, _| {
                request.size == 40
                    && request.quality == 30
                    && request.format == ThumbnailFormat::Jpeg
            })
            .times(1)
            .returning(move |_, _, output| {
                std::fs::write(output, FAKE_JPEG)?;
                *seen_in_mock.lock().unwrap() = Some(output.to_path_buf());
                Ok(())
            });

        let pipeline = ThumbnailPipeline::new(Arc::new(renderer), &settings());
        let rendered = pipeline.render(Path::new("/uploads/photo.jpg")).await.unwrap();

        assert_eq!(rendered.mime, "image/jpeg");
        assert_eq!(rendered.bytes, FAKE_JPEG);
        let temp = seen.lock().unwrap().clone().unwrap();
        assert!(!temp.exists());
    }

    #[tokio::test]
    async fn test_render_failure_removes_temp_file() {
        let seen = Arc::new(Mutex::new(None::<PathBuf>));
        let seen_in_mock = seen.clone();

        let mut renderer = MockImageRendererPort::new();
        renderer
            .expect_render()
            .times(1)
            .returning(move |_, _, output| {
                std::fs::write(output, b"partial")?;
                *seen_in_mock.lock().unwrap() = Some(output.to_path_buf());
                Err(RenderError::encode_failed("boom"))
            });

        let pipeline = ThumbnailPipeline::new(Arc::new(renderer), &settings());
        let result = pipeline.render(Path::new("photo.png")).await;

        assert!(matches!(result, Err(ThumbnailError::Render(_))));
        let temp = seen.lock().unwrap().clone().unwrap();
        assert!(!temp.exists());
    }

    #[tokio::test]
    async fn test_unsupported_source_never_reaches_renderer() {
        let renderer = MockImageRendererPort::new();
        let pipeline = ThumbnailPipeline::new(Arc::new(renderer), &settings());

        let result = pipeline.render(Path::new("scan.tiff")).await;
        assert!(matches!(
            result,
            Err(ThumbnailError::Render(RenderError::UnsupportedFormat { .. }))
        ));
    }

    #[tokio::test]
    async fn test_reference_prefix_is_fifth_segment() {
        let mut renderer = MockImageRendererPort::new();
        renderer
            .expect_write_reference_image()
            .times(1)
            .returning(|output| Ok(std::fs::write(output, b"reference")?));
        // Encodes as "/9j/4AAQ/SkZ/RgAAQ==".
        let bytes: Vec<u8> = vec![
            0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0xFD, 0x29, 0x19, 0xFD, 0x18, 0x00, 0x01,
        ];
        renderer.expect_render().times(1).returning(move |_, _, output| {
            std::fs::write(output, &bytes)?;
            Ok(())
        });

        let pipeline = ThumbnailPipeline::new(Arc::new(renderer), &settings());
        let prefix = pipeline.reference_prefix().await.unwrap();

        assert_eq!(prefix.as_deref(), Some("SkZ"));
    }
}
