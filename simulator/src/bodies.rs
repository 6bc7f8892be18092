//! Handles bodies and such

use crate::texture::Texture;
use euclid::default::Point3D;

/// The representation of a body, like a planet or a dwarf planet.
/// Doesn't store its position or how it moves; that's the Kinemat's job.
#[derive(Clone, Debug)]
pub struct Body {
    pub name: String,
    /// Visual radius in scene units. Nothing to do with the real thing.
    pub size: f64,
    /// Color is stored as 0xRRGGBB
    pub color: u32,
    /// Rotation of the body (and its rings) around the Z axis, in radians
    pub tilt: f64,
    pub rings: Option<Rings>,
    /// Whether to draw a soft atmosphere halo around it
    pub glow: bool,
    pub surface: Surface,
}

/// A flat ring around a body, like Saturn's.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rings {
    /// Inner radius in scene units
    pub inner: f64,
    /// Outer radius in scene units
    pub outer: f64,
    /// Color is stored as 0xRRGGBB
    pub color: u32,
    pub opacity: f64,
}

/// What the surface of a body looks like.
#[derive(Clone, Debug)]
pub enum Surface {
    /// Just the body's color
    Flat,
    /// A generated image wrapped onto the body
    Procedural(Texture),
}

/// A Kinemat holds all the kinematic information about something.
/// Radius and speeds are fixed at creation; the angles grow forever.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Kinemat {
    /// Where it is along its orbit, in radians. Never wrapped.
    pub angle: f64,
    pub orbit_radius: f64,
    /// Radians per tick
    pub orbit_speed: f64,
    /// Self-rotation angle in radians
    pub spin: f64,
    /// Radians per tick
    pub spin_speed: f64,
    /// Always consistent with `angle`.
    pub pos: Point3D<f64>,
}

impl Kinemat {
    /// Makes a Kinemat and places it on its orbit right away.
    pub fn new(angle: f64, orbit_radius: f64, orbit_speed: f64, spin_speed: f64, bob: f64) -> Self {
        Self {
            angle,
            orbit_radius,
            orbit_speed,
            spin: 0.0,
            spin_speed,
            pos: position_on_orbit(angle, orbit_radius, bob),
        }
    }

    /// A Kinemat that sits at the origin and never moves.
    pub fn fixed() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0, 0.0)
    }

    /// Advance by one tick.
    pub fn update(&mut self, bob: f64) {
        self.angle += self.orbit_speed;
        self.spin += self.spin_speed;
        self.pos = position_on_orbit(self.angle, self.orbit_radius, bob);
    }
}

/// Where something `radius` away from the center is at `angle` along its orbit.
/// The orbit lies in the XZ plane; Y gets a small cosmetic bob of at most `bob`.
pub fn position_on_orbit(angle: f64, radius: f64, bob: f64) -> Point3D<f64> {
    Point3D::new(
        angle.cos() * radius,
        (angle * 0.5).sin() * bob,
        angle.sin() * radius,
    )
}

/// An Orbiter is a combination of a Body and a Kinemat.
/// In other words, a thing and where it is (and how fast it's going.)
#[derive(Clone, Debug)]
pub struct Orbiter(pub Body, pub Kinemat);

/// The thing in the middle. It doesn't move.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sun {
    pub radius: f64,
    /// Color is stored as 0xRRGGBB
    pub color: u32,
    /// Color is stored as 0xRRGGBB
    pub glow_color: u32,
    /// The glow is this many times bigger than the sun
    pub glow_scale: f64,
    pub glow_opacity: f64,
}

/// How the scene is lit: a point light at the sun plus a flat ambient term.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Lighting {
    pub sun_intensity: f64,
    pub ambient: f64,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            sun_intensity: 2.2,
            ambient: 0.12,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::PI;

    #[test]
    fn new_kinemat_is_already_on_its_orbit() {
        let k = Kinemat::new(PI / 2.0, 10.0, 0.01, 0.0, 0.03);
        assert_abs_diff_eq!(k.pos.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(k.pos.z, 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(k.pos.y, (PI / 4.0).sin() * 0.03, epsilon = 1e-12);
    }

    #[test]
    fn update_moves_angle_and_spin_independently() {
        let mut k = Kinemat::new(1.0, 5.0, 0.25, -0.5, 0.0);
        k.update(0.0);
        k.update(0.0);
        assert_relative_eq!(k.angle, 1.5);
        assert_relative_eq!(k.spin, -1.0);
        assert_relative_eq!(k.orbit_radius, 5.0);
        assert_eq!(k.pos, position_on_orbit(1.5, 5.0, 0.0));
    }

    #[test]
    fn bob_stays_inside_amplitude() {
        let bob = 0.03;
        for i in 0..2000 {
            let angle = i as f64 * 0.0137 - 7.0;
            let p = position_on_orbit(angle, 42.0, bob);
            assert!(p.y.abs() <= bob, "y = {} at angle {}", p.y, angle);
        }
    }

    #[test]
    fn orbit_is_circular_in_xz() {
        for i in 0..500 {
            let angle = i as f64 * 0.05;
            let p = position_on_orbit(angle, 38.328, 0.03);
            assert_relative_eq!(p.x.hypot(p.z), 38.328, max_relative = 1e-12);
        }
    }

    #[test]
    fn fixed_kinemat_stays_put() {
        let mut k = Kinemat::fixed();
        for _ in 0..10 {
            k.update(0.03);
        }
        assert_eq!(k.pos, Point3D::zero());
    }
}
