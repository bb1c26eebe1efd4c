use std::f64::consts::PI;

use glam::{DVec3, Vec2};
use thiserror::Error;

use crate::math::mesh::SurfaceMesh;
use crate::math::transform::deg_to_rad;

/// Full turn sampled by the angular parameter, in degrees.
pub const ANGULAR_RANGE: f64 = 360.0;

const NORMAL_STEP: f64 = 1e-4;
const SAMPLE_SLACK: f64 = 1e-9;

/// Largest mesh `tessellate` will build.
pub const MAX_VERTICES: usize = 4_000_000;

#[derive(Debug, Error, PartialEq)]
pub enum SurfaceError {
    #[error("{name} step must be positive and finite, got {value}")]
    InvalidStep { name: &'static str, value: f64 },
    #[error("length l must be positive and finite, got {0}")]
    InvalidLength(f64),
    #[error("radius {name} must be finite, got {value}")]
    InvalidRadius { name: &'static str, value: f64 },
    #[error("pair offset must be finite, got ({0}, {1})")]
    InvalidOffset(f64, f64),
    #[error("steps would produce {requested} vertices, limit is {limit}")]
    TooManyVertices { requested: f64, limit: usize },
}

/// Cross-section of the revolved surface: maps `(a, b)` to a radius.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
    /// `(r2 - r1) * sin²(π·a / (4·a)) + r1`.
    ///
    /// Kept exactly as observed in reference renders: the argument collapses
    /// to `π/4` for every `a != 0` and is `NaN` at `a == 0`. `π·a / (4·l)`
    /// looks like the intended formula but has not been confirmed.
    AngularSine,
    /// `(r2 - r1) * sin²(π·a / (4·l)) * 100 + r1`.
    SineSquared,
    /// `(r2 - r1) * (1 - cos(π·a / (4·l))) * 100 + r1`.
    OneMinusCosine,
}

impl Profile {
    pub fn label(self) -> &'static str {
        match self {
            Profile::AngularSine => "sin²(πa/4a)",
            Profile::SineSquared => "sin²(πa/4l)",
            Profile::OneMinusCosine => "1 - cos(πa/4l)",
        }
    }
}

/// How the longitudinal parameter is swept for each angular sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sweep {
    /// `a` from 0 up to `2l`.
    Forward,
    /// `a` from 0 up to `2l`, then back down to 0. Closes the cap without a
    /// separate end-cap mesh.
    ForwardAndBack,
}

impl Sweep {
    pub fn passes(self) -> usize {
        match self {
            Sweep::Forward => 1,
            Sweep::ForwardAndBack => 2,
        }
    }
}

/// Constants and resolution of one surface of revolution.
///
/// Angles (`b`, `db`, `db_offset`) are in degrees. `a` runs over `[0, 2l]`
/// and is also passed through degree-to-radian conversion inside the
/// profile functions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceParams {
    pub profile: Profile,
    pub sweep: Sweep,
    pub r1: f64,
    pub r2: f64,
    pub l: f64,
    pub da: f64,
    pub db: f64,
    pub da_offset: f64,
    pub db_offset: f64,
}

impl SurfaceParams {
    pub fn validate(&self) -> Result<(), SurfaceError> {
        for (name, value) in [("longitudinal", self.da), ("angular", self.db)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SurfaceError::InvalidStep { name, value });
            }
        }
        if !(self.l.is_finite() && self.l > 0.0) {
            return Err(SurfaceError::InvalidLength(self.l));
        }
        for (name, value) in [("r1", self.r1), ("r2", self.r2)] {
            if !value.is_finite() {
                return Err(SurfaceError::InvalidRadius { name, value });
            }
        }
        if !(self.da_offset.is_finite() && self.db_offset.is_finite()) {
            return Err(SurfaceError::InvalidOffset(self.da_offset, self.db_offset));
        }

        let requested = 2.0
            * sample_span(ANGULAR_RANGE, self.db)
            * sample_span(2.0 * self.l, self.da)
            * self.sweep.passes() as f64;
        if requested > MAX_VERTICES as f64 {
            return Err(SurfaceError::TooManyVertices {
                requested,
                limit: MAX_VERTICES,
            });
        }
        Ok(())
    }

    /// Radius at longitudinal `a` and angular `b` (degrees). None of the
    /// shipped profiles depends on `b`.
    pub fn radius(&self, a: f64, _b: f64) -> f64 {
        let (r1, r2, l) = (self.r1, self.r2, self.l);
        let a = deg_to_rad(a);

        match self.profile {
            Profile::AngularSine => (r2 - r1) * (PI * a / (4.0 * a)).sin().powi(2) + r1,
            Profile::SineSquared => (r2 - r1) * (PI * a / (4.0 * l)).sin().powi(2) * 100.0 + r1,
            Profile::OneMinusCosine => {
                (r2 - r1) * (1.0 - (PI * a / (4.0 * l)).cos()) * 100.0 + r1
            }
        }
    }

    pub fn point(&self, a: f64, b: f64) -> DVec3 {
        let r = self.radius(a, b);
        let theta = deg_to_rad(b);
        DVec3::new(r * theta.cos(), r * theta.sin(), a)
    }

    /// Unit normal from central differences, falling back to the radial
    /// direction where the surface is degenerate.
    pub fn normal(&self, a: f64, b: f64) -> DVec3 {
        let h = NORMAL_STEP;
        let along_a = self.point(a + h, b) - self.point(a - h, b);
        let along_b = self.point(a, b + h) - self.point(a, b - h);
        let n = along_b.cross(along_a);

        if n.is_finite() && n.length_squared() > f64::EPSILON * f64::EPSILON {
            n.normalize()
        } else {
            let theta = deg_to_rad(b);
            DVec3::new(theta.cos(), theta.sin(), 0.0)
        }
    }

    pub fn uv(&self, a: f64, b: f64) -> Vec2 {
        Vec2::new((b / ANGULAR_RANGE) as f32, (a / (2.0 * self.l)) as f32)
    }

    pub fn angular_samples(&self) -> usize {
        sample_count(ANGULAR_RANGE, self.db)
    }

    pub fn longitudinal_samples(&self) -> usize {
        sample_count(2.0 * self.l, self.da)
    }

    /// Number of vertices `tessellate` emits for these parameters.
    pub fn vertex_count(&self) -> usize {
        self.angular_samples()
            .saturating_mul(self.longitudinal_samples())
            .saturating_mul(2 * self.sweep.passes())
    }
}

/// Samples `0, step, 2·step, ...` up to and including `range`. When the step
/// does not divide the range the last sample falls short of it.
pub fn sample_count(range: f64, step: f64) -> usize {
    (sample_span(range, step) as usize).max(1)
}

fn sample_span(range: f64, step: f64) -> f64 {
    (range / step + SAMPLE_SLACK).floor().max(0.0) + 1.0
}

/// Tessellates the surface into triangle-strip order.
///
/// Every `(a, b)` sample emits two vertices: the sample itself and a partner
/// displaced by `(da_offset, db_offset)`. The angular loop includes both 0
/// and 360 degrees so the seam is revisited.
pub fn tessellate(params: &SurfaceParams) -> Result<SurfaceMesh, SurfaceError> {
    params.validate()?;

    let angular = params.angular_samples();
    let longitudinal = params.longitudinal_samples();
    let a_max = 2.0 * params.l;

    let mut mesh = SurfaceMesh::with_capacity(params.vertex_count());

    for j in 0..angular {
        let b = (j as f64 * params.db).min(ANGULAR_RANGE);

        for pass in 0..params.sweep.passes() {
            for i in 0..longitudinal {
                let step = (i as f64 * params.da).min(a_max);
                let a = if pass == 0 { step } else { a_max - step };

                emit(&mut mesh, params, a, b);
                emit(
                    &mut mesh,
                    params,
                    a + params.da_offset,
                    b + params.db_offset,
                );
            }
        }
    }

    Ok(mesh)
}

fn emit(mesh: &mut SurfaceMesh, params: &SurfaceParams, a: f64, b: f64) {
    mesh.push(params.point(a, b), params.normal(a, b), params.uv(a, b));
}
