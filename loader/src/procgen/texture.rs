//! Procedural planet textures: a diagonal gradient with faint speckles and dark bands.

use crate::color;
use crate::error::LoadError;

use simulator::texture::Texture;

use rand::Rng;
use serde::Deserialize;
use tracing::debug;

/// Knobs for the texture generator.
#[derive(Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TextureParams {
    /// Width and height in pixels
    #[serde(deserialize_with = "crate::deserialize::whole_number")]
    pub size: u32,
    /// How many faint white specks to scatter
    #[serde(deserialize_with = "crate::deserialize::whole_number")]
    pub speckles: u32,
    /// How many dark horizontal bands to lay over the top
    #[serde(deserialize_with = "crate::deserialize::whole_number")]
    pub streaks: u32,
}

impl Default for TextureParams {
    fn default() -> Self {
        Self {
            size: 1024,
            speckles: 1200,
            streaks: 10,
        }
    }
}

impl TextureParams {
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.size == 0 {
            return Err(LoadError::invalid("texture.size", "must be at least 1"));
        }
        if self.size > MAX_SIZE {
            return Err(LoadError::invalid(
                "texture.size",
                format!("must be at most {}, got {}", MAX_SIZE, self.size),
            ));
        }
        Ok(())
    }
}

/// Past this the working canvas alone runs to hundreds of megabytes.
const MAX_SIZE: u32 = 4096;
/// Specks are at most this opaque
const SPECKLE_MAX_ALPHA: f64 = 0.03;
/// Specks are between 1 and this many pixels on a side
const SPECKLE_MAX_EXTENT: f64 = 7.0;
const STREAK_ALPHA: f64 = 0.06;
/// Streaks are this fraction of the image wide, on either side of the middle
const STREAK_HALF_WIDTH: f64 = 0.6;
const STREAK_MIN_HALF_HEIGHT: f64 = 6.0;
const STREAK_HEIGHT_JITTER: f64 = 20.0;

/// Paint a `params.size` square texture fading from `color_a` in the top left
/// to `color_b` in the bottom right, then rough it up with `rng`.
pub fn generate_texture<R: Rng + ?Sized>(
    color_a: u32,
    color_b: u32,
    params: &TextureParams,
    rng: &mut R,
) -> Texture {
    let mut canvas = Canvas::gradient(params.size, color::unpack(color_a), color::unpack(color_b));

    for _ in 0..params.speckles {
        let x = rng.gen::<f64>() * canvas.size as f64;
        let y = rng.gen::<f64>() * canvas.size as f64;
        let w = 1.0 + rng.gen::<f64>() * (SPECKLE_MAX_EXTENT - 1.0);
        let h = 1.0 + rng.gen::<f64>() * (SPECKLE_MAX_EXTENT - 1.0);
        let alpha = rng.gen::<f64>() * SPECKLE_MAX_ALPHA;
        canvas.speckle(x, y, w, h, alpha);
    }

    for _ in 0..params.streaks {
        let y = rng.gen::<f64>() * canvas.size as f64;
        let half_height = STREAK_MIN_HALF_HEIGHT + rng.gen::<f64>() * STREAK_HEIGHT_JITTER;
        canvas.streak(y, half_height);
    }

    debug!(
        size = params.size,
        speckles = params.speckles,
        streaks = params.streaks,
        "generated texture {:06x} -> {:06x}",
        color_a,
        color_b
    );
    canvas.into_texture()
}

/// Working buffer. Always opaque, so only RGB in [0, 1] is kept.
/// f32 is plenty for something that ends up as bytes.
struct Canvas {
    size: u32,
    pixels: Vec<[f32; 3]>,
}

impl Canvas {
    /// Fill with a linear gradient along the main diagonal, sampled at pixel centers.
    fn gradient(size: u32, from: [f64; 3], to: [f64; 3]) -> Self {
        let extent = 2.0 * size as f64;
        let mut pixels = Vec::with_capacity(size as usize * size as usize);
        for y in 0..size {
            for x in 0..size {
                let t = (x as f64 + 0.5 + y as f64 + 0.5) / extent;
                pixels.push([
                    (from[0] + (to[0] - from[0]) * t) as f32,
                    (from[1] + (to[1] - from[1]) * t) as f32,
                    (from[2] + (to[2] - from[2]) * t) as f32,
                ]);
            }
        }
        Self { size, pixels }
    }

    /// Blend white over every pixel whose center is inside the rectangle.
    fn speckle(&mut self, x: f64, y: f64, w: f64, h: f64, alpha: f64) {
        let (x0, x1) = self.covered(x, x + w);
        let (y0, y1) = self.covered(y, y + h);
        let alpha = alpha as f32;
        for py in y0..y1 {
            for px in x0..x1 {
                for c in self.at(px, py).iter_mut() {
                    *c = *c * (1.0 - alpha) + alpha;
                }
            }
        }
    }

    /// Darken every pixel whose center is inside the ellipse centered at (size/2, y).
    /// Multiplying by black at `STREAK_ALPHA` just scales the color down.
    fn streak(&mut self, cy: f64, half_height: f64) {
        let cx = self.size as f64 / 2.0;
        let half_width = self.size as f64 * STREAK_HALF_WIDTH;
        let (y0, y1) = self.covered(cy - half_height, cy + half_height);
        for py in y0..y1 {
            let dy = (py as f64 + 0.5 - cy) / half_height;
            if dy.abs() > 1.0 {
                continue;
            }
            let reach = half_width * (1.0 - dy * dy).sqrt();
            let (x0, x1) = self.covered(cx - reach, cx + reach);
            for px in x0..x1 {
                for c in self.at(px, py).iter_mut() {
                    *c *= (1.0 - STREAK_ALPHA) as f32;
                }
            }
        }
    }

    /// Pixels whose centers fall in [from, to), clamped to the canvas.
    fn covered(&self, from: f64, to: f64) -> (u32, u32) {
        let clamp = |v: f64| v.max(0.0).min(self.size as f64) as u32;
        (clamp((from - 0.5).ceil()), clamp((to - 0.5).ceil()))
    }

    fn at(&mut self, x: u32, y: u32) -> &mut [f32; 3] {
        &mut self.pixels[(y * self.size + x) as usize]
    }

    fn into_texture(self) -> Texture {
        Texture::from_fn(self.size, |x, y| {
            let [r, g, b] = self.pixels[(y * self.size + x) as usize];
            [quantize(r), quantize(g), quantize(b), 255]
        })
    }
}

fn quantize(c: f32) -> u8 {
    (c.max(0.0).min(1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    fn plain(size: u32) -> TextureParams {
        TextureParams {
            size,
            speckles: 0,
            streaks: 0,
        }
    }

    #[test]
    fn exactly_the_requested_size() {
        for &size in &[1, 7, 64, 257] {
            let params = TextureParams {
                size,
                speckles: 50,
                streaks: 3,
            };
            let tex = generate_texture(0xbfe7ef, 0x79c7d6, &params, &mut SmallRng::seed_from_u64(0));
            assert_eq!(tex.size(), size);
            assert_eq!(tex.rgba().len(), (size * size * 4) as usize);
        }
    }

    #[test]
    fn same_seed_same_pixels() {
        let params = TextureParams {
            size: 128,
            ..Default::default()
        };
        let a = generate_texture(0x5aa1e6, 0x134e7a, &params, &mut SmallRng::seed_from_u64(31));
        let b = generate_texture(0x5aa1e6, 0x134e7a, &params, &mut SmallRng::seed_from_u64(31));
        assert_eq!(a, b);
        let c = generate_texture(0x5aa1e6, 0x134e7a, &params, &mut SmallRng::seed_from_u64(32));
        assert_ne!(a, c);
    }

    #[test]
    fn gradient_runs_corner_to_corner() {
        let tex = generate_texture(0x000000, 0xffffff, &plain(256), &mut SmallRng::seed_from_u64(0));
        let [r0, ..] = tex.pixel(0, 0);
        let [r1, ..] = tex.pixel(255, 255);
        assert!(r0 <= 1, "top left is {}", r0);
        assert!(r1 >= 254, "bottom right is {}", r1);
        // The anti-diagonal is all the same shade.
        assert_eq!(tex.pixel(255, 0), tex.pixel(0, 255));
        assert_eq!(tex.pixel(200, 10), tex.pixel(10, 200));
        for px in tex.rgba().chunks_exact(4) {
            assert_eq!(px[3], 255);
        }
    }

    #[test]
    fn speckles_only_lighten() {
        let base = generate_texture(0x404040, 0x404040, &plain(64), &mut SmallRng::seed_from_u64(0));
        let params = TextureParams {
            size: 64,
            speckles: 400,
            streaks: 0,
        };
        let specked = generate_texture(0x404040, 0x404040, &params, &mut SmallRng::seed_from_u64(8));
        let mut changed = 0;
        for (a, b) in base.rgba().iter().zip(specked.rgba()) {
            assert!(b >= a);
            if b > a {
                changed += 1;
            }
        }
        assert!(changed > 0);
    }

    #[test]
    fn streaks_only_darken() {
        let base = generate_texture(0xc0c0c0, 0xc0c0c0, &plain(64), &mut SmallRng::seed_from_u64(0));
        let params = TextureParams {
            size: 64,
            speckles: 0,
            streaks: 10,
        };
        let streaked = generate_texture(0xc0c0c0, 0xc0c0c0, &params, &mut SmallRng::seed_from_u64(4));
        let mut darker = 0;
        for (a, b) in base.rgba().iter().zip(streaked.rgba()) {
            assert!(b <= a);
            if b < a {
                darker += 1;
            }
        }
        // The row through a streak's center is darkened all the way across.
        assert!(darker >= 64 * 3);
    }

    #[test]
    fn one_streak_darkens_by_six_percent() {
        let mut canvas = Canvas::gradient(16, [1.0; 3], [1.0; 3]);
        canvas.streak(8.0, 2.0);
        // Center row is inside, far rows are not.
        assert!((canvas.at(8, 8)[0] - 0.94).abs() < 1e-6);
        assert!((canvas.at(0, 8)[0] - 0.94).abs() < 1e-6);
        assert_eq!(canvas.at(8, 0)[0], 1.0);
        assert_eq!(canvas.at(8, 15)[0], 1.0);
    }

    #[test]
    fn speckle_covers_by_pixel_center() {
        let mut canvas = Canvas::gradient(8, [0.0; 3], [0.0; 3]);
        // Centers at 2.5 and 3.5 are inside [2.2, 4.2), 4.5 isn't.
        canvas.speckle(2.2, 2.2, 2.0, 2.0, 0.5);
        assert_eq!(canvas.at(2, 2)[0], 0.5);
        assert_eq!(canvas.at(3, 3)[0], 0.5);
        assert_eq!(canvas.at(4, 3)[0], 0.0);
        assert_eq!(canvas.at(1, 2)[0], 0.0);
    }

    #[test]
    fn validation() {
        assert!(TextureParams::default().validate().is_ok());
        assert!(plain(0).validate().is_err());
        assert!(plain(MAX_SIZE + 1).validate().is_err());
    }

    #[test]
    fn size_is_capped_at_4096() {
        assert!(plain(4096).validate().is_ok());
        assert!(plain(4097).validate().is_err());
        assert!(plain(8192).validate().is_err());
    }
}
