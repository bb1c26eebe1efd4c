use glam::{Mat4, Vec2, Vec3};

use crate::math::mesh::SurfaceMesh;
use crate::math::surface::{SurfaceError, SurfaceParams, tessellate};
use crate::math::transform::{multiply, normal_matrix};
use crate::renderer::camera::{CameraRig, Trackball};
use crate::renderer::context::{GraphicsContext, UniformValue, uniform};

pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Texture-center change per key press.
pub const TEX_CENTER_STEP: f32 = 0.05;

/// Light and material inputs, plus texture placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shading {
    pub light_position: Vec3,
    pub light_vec: Vec3,
    pub light_color: [f32; 3],
    pub shininess: f32,
    pub color: [f32; 4],
    pub tex_scale: Vec2,
    pub tex_center: Vec2,
}

impl Default for Shading {
    fn default() -> Self {
        Self {
            light_position: Vec3::new(0.0, 0.0, 5.0),
            light_vec: Vec3::ZERO,
            light_color: [0.0, 1.0, 1.0],
            shininess: 1.0,
            color: [0.0, 1.0, 1.0, 1.0],
            tex_scale: Vec2::ONE,
            tex_center: Vec2::ZERO,
        }
    }
}

impl Shading {
    /// Moves the texture center, clamping each component at 0.
    pub fn shift_tex_center(&mut self, delta: Vec2) {
        self.tex_center = (self.tex_center + delta).max(Vec2::ZERO);
    }
}

/// Matrices derived from the camera state for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameUniforms {
    pub projection: Mat4,
    pub model_view: Mat4,
    pub normal: Mat4,
    pub mvp: Mat4,
}

pub struct Scene {
    pub params: SurfaceParams,
    pub mesh: SurfaceMesh,
    pub trackball: Trackball,
    pub rig: CameraRig,
    pub shading: Shading,
}

impl Scene {
    pub fn new(params: SurfaceParams, trackball: Trackball) -> Result<Self, SurfaceError> {
        let mesh = tessellate(&params)?;
        log::info!(
            "Generated {} surface: {} vertices",
            params.profile.label(),
            mesh.vertex_count()
        );

        Ok(Self {
            params,
            mesh,
            trackball,
            rig: CameraRig::default(),
            shading: Shading::default(),
        })
    }

    /// Rebuilds the mesh from `params`. On error the previous mesh and
    /// parameters are kept.
    pub fn regenerate(&mut self, params: SurfaceParams) -> Result<(), SurfaceError> {
        let mesh = tessellate(&params)?;
        log::info!(
            "Generated {} surface: {} vertices",
            params.profile.label(),
            mesh.vertex_count()
        );
        self.params = params;
        self.mesh = mesh;
        Ok(())
    }

    pub fn frame_uniforms(&self) -> FrameUniforms {
        let projection = self.rig.projection_matrix();
        let model_view = self.rig.model_view(self.trackball.view_matrix());

        FrameUniforms {
            projection,
            model_view,
            normal: normal_matrix(model_view),
            mvp: multiply(projection, model_view),
        }
    }

    pub fn draw(&self, ctx: &mut impl GraphicsContext) {
        ctx.clear(CLEAR_COLOR);

        let frame = self.frame_uniforms();
        let shading = &self.shading;

        ctx.set_uniform(uniform::MODEL_VIEW_PROJECTION, UniformValue::Mat4(frame.mvp));
        ctx.set_uniform(uniform::NORMAL_MATRIX, UniformValue::Mat4(frame.normal));
        ctx.set_uniform(uniform::WORLD, UniformValue::Mat4(frame.model_view));
        ctx.set_uniform(
            uniform::LIGHT_POSITION,
            UniformValue::Vec3(shading.light_position.to_array()),
        );
        ctx.set_uniform(uniform::LIGHT_VEC, UniformValue::Vec3(shading.light_vec.to_array()));
        ctx.set_uniform(uniform::SHININESS, UniformValue::Float(shading.shininess));
        ctx.set_uniform(uniform::LIGHT_COLOR, UniformValue::Vec3(shading.light_color));
        ctx.set_uniform(uniform::COLOR, UniformValue::Vec4(shading.color));
        ctx.set_uniform(uniform::TEX_SCALE, UniformValue::Vec2(shading.tex_scale.to_array()));
        ctx.set_uniform(uniform::TEX_CENTER, UniformValue::Vec2(shading.tex_center.to_array()));

        ctx.draw_strip(self.mesh.vertex_count() as u32);
    }
}
