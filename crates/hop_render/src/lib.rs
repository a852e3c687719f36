pub mod batch;
pub mod gpu_context;
pub mod projection;
pub mod renderer;
pub mod sprite_pipeline;
pub mod texture;
pub mod vertex;

pub use batch::{DrawCall, SpriteBatch, SpriteQuad};
pub use gpu_context::GpuContext;
pub use projection::ScreenProjection;
pub use renderer::SpriteRenderer;
pub use sprite_pipeline::SpritePipeline;
pub use texture::Texture;
pub use vertex::SpriteVertex;
