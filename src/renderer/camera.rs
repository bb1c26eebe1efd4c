use glam::{Mat4, Quat, Vec2, Vec3};

use crate::math::transform::{axis_rotation, multiply, perspective, translation};

pub const RIG_AXIS: Vec3 = Vec3::new(0.707, 0.707, 0.0);
pub const RIG_ANGLE: f32 = 0.7;
pub const RIG_OFFSET: Vec3 = Vec3::new(0.0, 0.0, -10.0);

pub const PROJECTION_FOV: f32 = std::f32::consts::PI / 8.0;
pub const PROJECTION_ASPECT: f32 = 1.0;
pub const PROJECTION_NEAR: f32 = 8.0;
pub const PROJECTION_FAR: f32 = 12.0;

/// Fixed transform that places the object in front of the camera, plus the
/// projection used to look at it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraRig {
    pub axis: Vec3,
    pub angle: f32,
    pub offset: Vec3,

    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            axis: RIG_AXIS,
            angle: RIG_ANGLE,
            offset: RIG_OFFSET,

            fov: PROJECTION_FOV,
            aspect: PROJECTION_ASPECT,
            near: PROJECTION_NEAR,
            far: PROJECTION_FAR,
        }
    }
}

impl CameraRig {
    pub fn projection_matrix(&self) -> Mat4 {
        perspective(self.fov, self.aspect, self.near, self.far)
    }

    /// `translation · axis_rotation · view`.
    pub fn model_view(&self, view: Mat4) -> Mat4 {
        let rotate = axis_rotation(self.axis, self.angle);
        let translate = translation(self.offset.x, self.offset.y, self.offset.z);
        multiply(translate, multiply(rotate, view))
    }
}

/// Virtual trackball turning pointer drags into an accumulated orientation.
///
/// The cursor is projected onto a unit sphere inscribed in the viewport;
/// each move rotates the orientation by the arc from the previous projected
/// point to the current one.
pub struct Trackball {
    orientation: Quat,
    initial: Quat,
    anchor: Option<Vec3>,
    viewport: Vec2,
    on_change: Box<dyn FnMut()>,
}

impl Trackball {
    /// `initial_spin` rotates the starting orientation about the view Y axis, in radians.
    pub fn new(viewport: Vec2, on_change: impl FnMut() + 'static, initial_spin: f32) -> Self {
        let initial = Quat::from_rotation_y(initial_spin);
        Self {
            orientation: initial,
            initial,
            anchor: None,
            viewport: viewport.max(Vec2::ONE),
            on_change: Box::new(on_change),
        }
    }

    pub fn pointer_down(&mut self, cursor: Vec2) {
        self.anchor = Some(self.project(cursor));
    }

    pub fn pointer_move(&mut self, cursor: Vec2) {
        let Some(anchor) = self.anchor else {
            return;
        };

        let current = self.project(cursor);
        if current.abs_diff_eq(anchor, f32::EPSILON) {
            return;
        }

        self.orientation = (Self::rotation_between(anchor, current) * self.orientation).normalize();
        self.anchor = Some(current);
        (self.on_change)();
    }

    pub fn pointer_up(&mut self) {
        self.anchor = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport.max(Vec2::ONE);
    }

    /// Restores the starting orientation, including `initial_spin`.
    pub fn reset(&mut self) {
        self.orientation = self.initial;
        self.anchor = None;
        (self.on_change)();
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Rotation-only view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.orientation)
    }

    pub fn project(&self, cursor: Vec2) -> Vec3 {
        let half = self.viewport * 0.5;
        let radius = half.min_element();
        let x = (cursor.x - half.x) / radius;
        let y = (half.y - cursor.y) / radius;

        let d2 = x * x + y * y;
        if d2 <= 1.0 {
            Vec3::new(x, y, (1.0 - d2).sqrt())
        } else {
            Vec3::new(x, y, 0.0).normalize()
        }
    }

    pub fn rotation_between(from: Vec3, to: Vec3) -> Quat {
        Quat::from_rotation_arc(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    const VIEWPORT: Vec2 = Vec2::new(800.0, 800.0);

    fn trackball() -> Trackball {
        Trackball::new(VIEWPORT, || {}, 0.0)
    }

    fn drag(ball: &mut Trackball, path: &[Vec2]) {
        ball.pointer_down(path[0]);
        for p in &path[1..] {
            ball.pointer_move(*p);
        }
        ball.pointer_up();
    }

    #[test]
    fn test_default_rig_constants() {
        let rig = CameraRig::default();
        assert_eq!(rig.axis, Vec3::new(0.707, 0.707, 0.0));
        assert_eq!(rig.angle, 0.7);
        assert_eq!(rig.offset, Vec3::new(0.0, 0.0, -10.0));
        assert_eq!(rig.near, 8.0);
        assert_eq!(rig.far, 12.0);
        assert_eq!(rig.aspect, 1.0);
    }

    #[test]
    fn test_rig_places_origin_in_front_of_camera() {
        let rig = CameraRig::default();
        let mv = rig.model_view(Mat4::IDENTITY);
        let origin = mv.transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(Vec3::new(0.0, 0.0, -10.0), 1e-6));

        let clip = rig.projection_matrix() * origin.extend(1.0);
        let depth = clip.z / clip.w;
        assert!(depth > 0.0 && depth < 1.0);
    }

    #[test]
    fn test_initial_view_is_identity() {
        let ball = trackball();
        assert!(ball.view_matrix().abs_diff_eq(Mat4::IDENTITY, 1e-6));
        assert!(!ball.is_dragging());
    }

    #[test]
    fn test_initial_spin() {
        let ball = Trackball::new(VIEWPORT, || {}, std::f32::consts::FRAC_PI_2);
        let x = ball.view_matrix().transform_vector3(Vec3::X);
        assert!(x.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-6));
    }

    #[test]
    fn test_view_matrix_has_no_translation() {
        let mut ball = trackball();
        drag(&mut ball, &[Vec2::new(400.0, 400.0), Vec2::new(520.0, 330.0)]);
        let view = ball.view_matrix();
        assert_eq!(view.w_axis, glam::Vec4::W);
    }

    #[test]
    fn test_project_center_and_outside() {
        let ball = trackball();
        let center = ball.project(Vec2::new(400.0, 400.0));
        assert!(center.abs_diff_eq(Vec3::Z, 1e-6));

        let outside = ball.project(Vec2::new(2000.0, 400.0));
        assert!(outside.abs_diff_eq(Vec3::X, 1e-6));

        let up = ball.project(Vec2::new(400.0, 0.0));
        assert!(up.abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn test_drag_right_turns_front_towards_right() {
        let mut ball = trackball();
        drag(&mut ball, &[Vec2::new(400.0, 400.0), Vec2::new(500.0, 400.0)]);

        let front = ball.view_matrix().transform_vector3(Vec3::Z);
        assert!(front.x > 0.0);
        assert!(front.y.abs() < 1e-6);
    }

    #[test]
    fn test_move_without_drag_is_ignored() {
        let mut ball = trackball();
        ball.pointer_move(Vec2::new(600.0, 100.0));
        assert!(ball.orientation().abs_diff_eq(Quat::IDENTITY, 1e-6));

        drag(&mut ball, &[Vec2::new(400.0, 400.0), Vec2::new(450.0, 400.0)]);
        let after_drag = ball.orientation();
        ball.pointer_move(Vec2::new(100.0, 100.0));
        assert_eq!(ball.orientation(), after_drag);
    }

    #[test]
    fn test_on_change_called_per_move() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut ball = Trackball::new(VIEWPORT, move || counter.set(counter.get() + 1), 0.0);

        drag(
            &mut ball,
            &[
                Vec2::new(400.0, 400.0),
                Vec2::new(410.0, 400.0),
                Vec2::new(420.0, 405.0),
                Vec2::new(420.0, 405.0),
            ],
        );
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_drag_composition_law() {
        let paths = [
            [Vec2::new(400.0, 400.0), Vec2::new(480.0, 380.0), Vec2::new(300.0, 520.0)],
            [Vec2::new(120.0, 640.0), Vec2::new(700.0, 90.0), Vec2::new(410.0, 410.0)],
            [Vec2::new(790.0, 10.0), Vec2::new(5.0, 400.0), Vec2::new(650.0, 700.0)],
        ];

        for path in paths {
            let mut ball = trackball();
            drag(&mut ball, &path[..2]);
            drag(&mut ball, &path[1..]);

            let s0 = ball.project(path[0]);
            let s1 = ball.project(path[1]);
            let s2 = ball.project(path[2]);
            let a = Mat4::from_quat(Trackball::rotation_between(s0, s1));
            let b = Mat4::from_quat(Trackball::rotation_between(s1, s2));

            assert!(ball.view_matrix().abs_diff_eq(b * a, 1e-5));

            // one continuous drag through the same points gives the same result
            let mut continuous = trackball();
            drag(&mut continuous, &path);
            assert!(continuous.view_matrix().abs_diff_eq(ball.view_matrix(), 1e-5));
        }
    }

    #[test]
    fn test_model_view_inverse_round_trip() {
        let rig = CameraRig::default();
        let mut ball = trackball();

        for step in 0..20 {
            let t = step as f32 * 0.37;
            drag(
                &mut ball,
                &[
                    Vec2::new(400.0, 400.0),
                    Vec2::new(400.0 + 300.0 * t.cos(), 400.0 + 250.0 * t.sin()),
                ],
            );

            let mv = rig.model_view(ball.view_matrix());
            assert!((mv.inverse() * mv).abs_diff_eq(Mat4::IDENTITY, 1e-5));
        }
    }

    #[test]
    fn test_reset() {
        let mut ball = trackball();
        drag(&mut ball, &[Vec2::new(400.0, 400.0), Vec2::new(600.0, 200.0)]);
        ball.reset();
        assert_eq!(ball.orientation(), Quat::IDENTITY);
    }

    #[test]
    fn test_reset_restores_initial_spin() {
        let spin = 0.6;
        let mut ball = Trackball::new(VIEWPORT, || {}, spin);
        drag(&mut ball, &[Vec2::new(400.0, 400.0), Vec2::new(250.0, 560.0)]);
        assert!(!ball.orientation().abs_diff_eq(Quat::from_rotation_y(spin), 1e-4));

        ball.reset();
        assert!(ball.orientation().abs_diff_eq(Quat::from_rotation_y(spin), 1e-6));
        assert!(!ball.is_dragging());
    }
}
