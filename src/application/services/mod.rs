//! Application services.

pub mod payload_codec;
pub mod pipeline;
pub mod settings_fingerprint;
pub mod thumbnail_service;

pub use payload_codec::{DecodedImage, JPEG_DATA_URI_HEADER, PayloadCodec};
pub use pipeline::{RenderedThumbnail, ThumbnailPipeline};
pub use settings_fingerprint::{CacheInvalidator, InvalidationOutcome, SettingsFingerprint};
pub use thumbnail_service::{Regeneration, SkipReason, ThumbnailService};
