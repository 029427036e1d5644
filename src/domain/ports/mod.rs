mod artifact_store_port;
mod host_port;
mod renderer_port;

pub use artifact_store_port::ArtifactStorePort;
pub use host_port::{EntityRepositoryPort, MetaStorePort, OptionStorePort};
pub use renderer_port::{ImageRendererPort, RenderRequest, ThumbnailFormat};

#[cfg(test)]
pub mod mocks {
    pub use super::renderer_port::MockImageRendererPort;
    pub use super::renderer_port::stub::{STUB_JPEG, StubRenderer};
}
