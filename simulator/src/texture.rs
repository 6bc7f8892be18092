//! Images that get wrapped onto bodies.

/// A square RGBA8 image, stored row by row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Texture {
    size: u32,
    rgba: Vec<u8>,
}

impl Texture {
    /// Wrap up a pixel buffer.
    /// Returns None if `rgba` isn't exactly `size * size` pixels.
    pub fn from_rgba(size: u32, rgba: Vec<u8>) -> Option<Self> {
        if rgba.len() == (size as usize) * (size as usize) * 4 {
            Some(Self { size, rgba })
        } else {
            None
        }
    }

    /// Build a texture by asking `pixel` for the color at every (x, y).
    pub fn from_fn(size: u32, mut pixel: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let mut rgba = Vec::with_capacity(size as usize * size as usize * 4);
        for y in 0..size {
            for x in 0..size {
                rgba.extend_from_slice(&pixel(x, y));
            }
        }
        Self { size, rgba }
    }

    /// Width and height in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// The pixel at (x, y), with (0, 0) in the top left.
    /// Panics if it's out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.size && y < self.size, "pixel ({}, {}) out of bounds", x, y);
        let idx = ((y * self.size + x) * 4) as usize;
        [
            self.rgba[idx],
            self.rgba[idx + 1],
            self.rgba[idx + 2],
            self.rgba[idx + 3],
        ]
    }

    /// The average color as 0xRRGGBB. Handy when the thing is too small on screen to texture.
    pub fn average_color(&self) -> u32 {
        let count = (self.size as u64 * self.size as u64).max(1);
        let mut sums = [0u64; 3];
        for px in self.rgba.chunks_exact(4) {
            sums[0] += px[0] as u64;
            sums[1] += px[1] as u64;
            sums[2] += px[2] as u64;
        }
        let [r, g, b] = [sums[0] / count, sums[1] / count, sums[2] / count];
        ((r as u32) << 16) | ((g as u32) << 8) | b as u32
    }
}
