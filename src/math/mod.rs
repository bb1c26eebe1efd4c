pub mod mesh;
pub mod presets;
pub mod surface;
pub mod transform;

pub use presets::SURFACE_PRESETS;
pub use surface::SurfaceError;
