//! A camera that circles a point, and the perspective projection that goes with it.

use euclid::default::{Point2D, Point3D, Vector3D};

/// Looks at `target` from `distance` away.
/// Yaw spins around the vertical axis (0 = looking from +Z), pitch tips up from the XZ plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OrbitCamera {
    pub target: Point3D<f64>,
    pub yaw: f64,
    pub pitch: f64,
    pub distance: f64,
    /// Vertical field of view in radians
    pub fov_y: f64,
    pub near: f64,
    pub far: f64,
}

/// Where a point lands on screen.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Projected {
    /// Pixels, (0, 0) in the top left
    pub screen: Point2D<f32>,
    /// Distance along the view direction
    pub depth: f64,
    /// Pixels per scene unit at this depth
    pub scale: f64,
}

/// The camera's right, up and forward vectors.
#[derive(Copy, Clone, Debug)]
pub struct Basis {
    pub right: Vector3D<f64>,
    pub up: Vector3D<f64>,
    pub forward: Vector3D<f64>,
}

impl Default for OrbitCamera {
    /// Back and a little above, so the outer planets fit.
    fn default() -> Self {
        let (height, back) = DEFAULT_EYE;
        Self {
            target: Point3D::origin(),
            yaw: 0.0,
            pitch: height.atan2(back),
            distance: height.hypot(back),
            fov_y: 75f64.to_radians(),
            near: 0.1,
            far: 4000.0,
        }
    }
}

impl OrbitCamera {
    pub fn eye(&self) -> Point3D<f64> {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target
            + Vector3D::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance
    }

    pub fn basis(&self) -> Basis {
        let forward = (self.target - self.eye()).normalize();
        let right = forward.cross(Vector3D::new(0.0, 1.0, 0.0)).normalize();
        let up = right.cross(forward);
        Basis { right, up, forward }
    }

    /// Swing around the target. Pitch stops just short of straight up or down.
    pub fn orbit(&mut self, dyaw: f64, dpitch: f64) {
        self.yaw += dyaw;
        self.pitch = (self.pitch + dpitch).max(-MAX_PITCH).min(MAX_PITCH);
    }

    /// Multiply the distance by `factor`. Less than 1 moves in.
    pub fn zoom(&mut self, factor: f64) {
        self.distance = (self.distance * factor).max(MIN_DISTANCE).min(self.far * 0.9);
    }

    /// Slide the target sideways (`dx`) and forwards (`dz`) along the ground plane.
    pub fn pan(&mut self, dx: f64, dz: f64) {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let right = Vector3D::new(cos_yaw, 0.0, -sin_yaw);
        let ahead = Vector3D::new(-sin_yaw, 0.0, -cos_yaw);
        self.target += right * dx + ahead * dz;
    }

    /// Project a point onto a `width` by `height` screen.
    /// None if it's behind the camera or outside the near/far planes.
    pub fn project(&self, point: Point3D<f64>, width: f32, height: f32) -> Option<Projected> {
        let basis = self.basis();
        let rel = point - self.eye();
        let depth = rel.dot(basis.forward);
        if depth < self.near || depth > self.far {
            return None;
        }
        let focal = (height as f64 / 2.0) / (self.fov_y / 2.0).tan();
        let scale = focal / depth;
        let x = rel.dot(basis.right) * scale;
        let y = rel.dot(basis.up) * scale;
        Some(Projected {
            screen: Point2D::new(width / 2.0 + x as f32, height / 2.0 - y as f32),
            depth,
            scale,
        })
    }
}

/// (height, distance back) of the default eye position
const DEFAULT_EYE: (f64, f64) = (120.0, 600.0);
const MAX_PITCH: f64 = std::f64::consts::FRAC_PI_2 - 0.01;
const MIN_DISTANCE: f64 = 2.0;
