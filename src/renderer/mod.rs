pub mod camera;
pub mod context;
pub mod error;
pub mod gpu;
pub mod texture;

pub use camera::Trackball;
pub use error::RenderError;
pub use gpu::GpuState;
pub use texture::TextureLoader;
