//! dbthumb - tiny inline thumbnails for CMS featured images.
//!
//! Whenever an entity's featured image changes, a very small JPEG/PNG/WebP
//! thumbnail is rendered, base64-encoded as a data URI, compacted, and cached
//! next to the entity (or in a file), so templates can inline a placeholder
//! without an extra request.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the thumbnail services and plugin facade.
pub mod application;
/// Domain layer containing entities, errors, events, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for the host, storage, and images.
pub mod infrastructure;

pub use application::{ThumbnailPlugin, ThumbnailPorts, ThumbnailService};

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "dbthumb";
