//! Application layer: thumbnail services and the plugin facade.

/// Port wiring.
pub mod context;
/// Host-facing facade.
pub mod plugin;
/// Thumbnail generation services.
pub mod services;

pub use context::ThumbnailPorts;
pub use plugin::ThumbnailPlugin;
pub use services::{PayloadCodec, Regeneration, SkipReason, ThumbnailService};
