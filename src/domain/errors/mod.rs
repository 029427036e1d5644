//! Domain error types.

mod codec_error;
mod host_error;
mod render_error;
mod store_error;
mod thumbnail_error;

pub use codec_error::CodecError;
pub use host_error::HostError;
pub use render_error::RenderError;
pub use store_error::StoreError;
pub use thumbnail_error::{ThumbnailError, ThumbnailResult};
