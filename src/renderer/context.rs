use glam::Mat4;

/// Uniform names shared with the WGSL sources.
pub mod uniform {
    pub const MODEL_VIEW_PROJECTION: &str = "ModelViewProjectionMatrix";
    pub const NORMAL_MATRIX: &str = "normalMat";
    pub const WORLD: &str = "world";
    pub const COLOR: &str = "color";
    pub const LIGHT_COLOR: &str = "lightColor";
    pub const SHININESS: &str = "shininess";
    pub const LIGHT_POSITION: &str = "lightPosition";
    pub const LIGHT_VEC: &str = "lightVec";
    pub const TEX_SCALE: &str = "texScale";
    pub const TEX_CENTER: &str = "texCenter";
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat4(Mat4),
}

/// Per-frame drawing capabilities the scene needs from the graphics backend.
pub trait GraphicsContext {
    /// Clears color and depth for the frame being recorded.
    fn clear(&mut self, color: [f32; 4]);

    /// Sets a named uniform. Names the shader does not declare are ignored.
    fn set_uniform(&mut self, name: &str, value: UniformValue);

    /// Draws the first `vertex_count` uploaded vertices as a triangle strip.
    fn draw_strip(&mut self, vertex_count: u32);
}
