//! Keys of everything the thumbnail core persists in the host.

/// Host-owned entity meta holding the source image (featured image) id.
pub const SOURCE_IMAGE: &str = "_thumbnail_id";

/// Entity meta holding the payload when the metadata backend is active.
pub const PAYLOAD: &str = "dbthumb_payload";

/// Entity meta holding the source image id the payload was derived from.
pub const PAYLOAD_SOURCE: &str = "dbthumb_payload_id";

/// Entity meta holding the dominant color.
pub const COLOR: &str = "dbthumb_color";

/// Option holding the settings fingerprint.
pub const SETTINGS_VERSION: &str = "dbthumb_settings_version";

/// Option holding the shared dictionary prefix.
pub const JPEG_PREFIX: &str = "dbthumb_jpeg_prefix";

/// Every entity meta key owned by the thumbnail core.
pub const OWNED_ENTITY_KEYS: [&str; 3] = [PAYLOAD, PAYLOAD_SOURCE, COLOR];
