//! Scatters stars in a thick shell around everything else.

use crate::color;
use crate::error::{check_finite, check_non_negative, LoadError};

use simulator::stars::Star;

use euclid::default::Point3D;
use rand::Rng;
use serde::Deserialize;

/// Knobs for the starfield.
#[derive(Deserialize, Copy, Clone, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StarfieldParams {
    #[serde(deserialize_with = "crate::deserialize::whole_number")]
    pub count: u32,
    /// Closest a star can be to the center
    pub min_radius: f64,
    /// Farthest a star can be from the center
    pub max_radius: f64,
    /// Every star has this hue, in [0, 1]
    pub hue: f64,
    pub saturation: f64,
    pub min_lightness: f64,
    pub max_lightness: f64,
    /// How fast the whole sky turns, radians per tick
    pub spin_speed: f64,
}

impl Default for StarfieldParams {
    fn default() -> Self {
        Self {
            count: 8000,
            min_radius: 50.0,
            max_radius: 250.0,
            hue: 0.6,
            saturation: 0.2,
            min_lightness: 0.1,
            max_lightness: 0.9,
            spin_speed: -0.0002,
        }
    }
}

impl StarfieldParams {
    pub fn validate(&self) -> Result<(), LoadError> {
        check_non_negative("stars.min_radius", self.min_radius)?;
        check_non_negative("stars.max_radius", self.max_radius)?;
        if self.min_radius > self.max_radius {
            return Err(LoadError::invalid(
                "stars.min_radius",
                format!(
                    "must not exceed max_radius ({} > {})",
                    self.min_radius, self.max_radius
                ),
            ));
        }
        for &(field, value) in &[
            ("stars.hue", self.hue),
            ("stars.saturation", self.saturation),
            ("stars.min_lightness", self.min_lightness),
            ("stars.max_lightness", self.max_lightness),
        ] {
            check_finite(field, value)?;
            if !(0.0..=1.0).contains(&value) {
                return Err(LoadError::invalid(field, format!("must be in [0, 1], got {}", value)));
            }
        }
        if self.min_lightness > self.max_lightness {
            return Err(LoadError::invalid(
                "stars.min_lightness",
                "must not exceed max_lightness",
            ));
        }
        check_finite("stars.spin_speed", self.spin_speed)
    }
}

/// Make `params.count` stars.
/// Distance from the center is uniform in the radius band, and directions are
/// uniform over the sphere (inverse-CDF on the polar angle, so no bunching at the poles).
pub fn sample_starfield<R: Rng + ?Sized>(params: &StarfieldParams, rng: &mut R) -> Vec<Star> {
    let band = params.max_radius - params.min_radius;
    let lightness_band = params.max_lightness - params.min_lightness;
    (0..params.count)
        .map(|_| {
            let radius = rng.gen::<f64>() * band + params.min_radius;
            let u: f64 = rng.gen();
            let v: f64 = rng.gen();
            let theta = 2.0 * std::f64::consts::PI * u;
            let phi = (2.0 * v - 1.0).acos();
            let pos = Point3D::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
            );

            let lightness = rng.gen::<f64>() * lightness_band + params.min_lightness;
            let [r, g, b] = color::hsl_to_rgb([params.hue, params.saturation, lightness]);
            Star {
                pos,
                color: [r as f32, g as f32, b as f32],
            }
        })
        .collect()
}
