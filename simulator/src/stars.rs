//! The background stars.

use euclid::default::Point3D;

/// One background star. Never changes once it's made.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Star {
    pub pos: Point3D<f64>,
    /// RGB, each in [0, 1]
    pub color: [f32; 3],
}

/// All the stars, plus how far the whole sky has turned.
#[derive(Clone, Debug, Default)]
pub struct Starfield {
    pub stars: Vec<Star>,
    /// Rotation of the whole field around the Y axis, in radians
    pub spin: f64,
    /// Radians per tick
    pub spin_speed: f64,
}

impl Starfield {
    pub fn new(stars: Vec<Star>, spin_speed: f64) -> Self {
        Self {
            stars,
            spin: 0.0,
            spin_speed,
        }
    }

    pub fn update(&mut self) {
        self.spin += self.spin_speed;
    }

    /// Where a star currently is, once the sky's rotation is applied.
    pub fn rotated(&self, star: &Star) -> Point3D<f64> {
        let (sin, cos) = self.spin.sin_cos();
        // Rotation about +Y
        Point3D::new(
            star.pos.x * cos + star.pos.z * sin,
            star.pos.y,
            -star.pos.x * sin + star.pos.z * cos,
        )
    }
}
