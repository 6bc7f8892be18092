//! Fakes sunlight on flat discs: works out which part of a body's disc is in shadow.

use crate::camera::Basis;

use euclid::default::{Point2D, Point3D, Vector2D};
use simulator::bodies::Lighting;

/// The outline of the dark part of a disc, in screen pixels.
/// Empty when the body is fully lit from where we're looking.
pub fn shadow_outline(
    center: Point2D<f32>,
    radius: f32,
    body: Point3D<f64>,
    sun: Point3D<f64>,
    eye: Point3D<f64>,
    basis: &Basis,
    segments: usize,
) -> Vec<Point2D<f32>> {
    let to_sun = sun - body;
    let to_eye = eye - body;
    if to_sun.length() < std::f64::EPSILON || to_eye.length() < std::f64::EPSILON {
        return Vec::new();
    }
    let to_sun = to_sun.normalize();
    // 1 = we see the lit side full on, -1 = we see only the night side.
    let phase = to_sun.dot(to_eye.normalize());
    if phase > 1.0 - 1e-6 {
        return Vec::new();
    }

    // Which way the sun is on screen. Y flips because screen Y points down.
    let toward = Vector2D::new(to_sun.dot(basis.right), -to_sun.dot(basis.up));
    let toward = if toward.length() < 1e-9 {
        Vector2D::new(1.0, 0.0)
    } else {
        toward.normalize()
    };
    let side = Vector2D::new(-toward.y, toward.x);

    let center = center.cast::<f64>();
    let radius = radius as f64;
    let half = segments.max(2);
    let mut out = Vec::with_capacity(half * 2 + 2);
    // The limb on the far side from the sun, from `side` around to `-side`...
    for i in 0..=half {
        let t = std::f64::consts::PI * i as f64 / half as f64;
        let dir = side * t.cos() - toward * t.sin();
        out.push(center + dir * radius);
    }
    // ...then back along the terminator, which bulges depending on the phase.
    for i in 1..half {
        let s = -std::f64::consts::FRAC_PI_2 + std::f64::consts::PI * i as f64 / half as f64;
        let dir = side * s.sin() - toward * (phase * s.cos());
        out.push(center + dir * radius);
    }
    out.into_iter().map(|p| p.cast::<f32>()).collect()
}

/// How dark the night side is drawn: the ambient light compared to full sunlight.
pub fn shadow_alpha(lighting: &Lighting) -> f32 {
    let full = lighting.sun_intensity.max(lighting.ambient);
    if full <= 0.0 {
        return MAX_SHADOW;
    }
    ((1.0 - lighting.ambient / full) as f32).max(0.0).min(MAX_SHADOW)
}

/// Never go fully black so the night side still reads as a planet.
const MAX_SHADOW: f32 = 0.85;
