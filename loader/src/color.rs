//! Color juggling. Colors travel around as 0xRRGGBB.

/// Split 0xRRGGBB into channels in [0, 1].
pub fn unpack(color: u32) -> [f64; 3] {
    [
        ((color >> 16) & 0xff) as f64 / 255.0,
        ((color >> 8) & 0xff) as f64 / 255.0,
        (color & 0xff) as f64 / 255.0,
    ]
}

/// Inverse of `unpack`. Channels are clamped to [0, 1] first.
pub fn pack(rgb: [f64; 3]) -> u32 {
    let [r, g, b] = rgb.map(|c| (c.max(0.0).min(1.0) * 255.0).round() as u32);
    (r << 16) | (g << 8) | b
}

/// Hue, saturation and lightness, all in [0, 1].
pub fn rgb_to_hsl([r, g, b]: [f64; 3]) -> [f64; 3] {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (min + max) / 2.0;
    if (max - min).abs() < std::f64::EPSILON {
        return [0.0, 0.0, lightness];
    }
    let delta = max - min;
    let saturation = if lightness <= 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };
    let hue = if max == r {
        (g - b) / delta + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    [hue / 6.0, saturation, lightness]
}

/// Back from HSL to RGB. Hue wraps around.
pub fn hsl_to_rgb([h, s, l]: [f64; 3]) -> [f64; 3] {
    let h = h.rem_euclid(1.0);
    let s = s.max(0.0).min(1.0);
    let l = l.max(0.0).min(1.0);
    if s == 0.0 {
        return [l, l, l];
    }
    let high = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let low = 2.0 * l - high;
    [
        hue_to_channel(low, high, h + 1.0 / 3.0),
        hue_to_channel(low, high, h),
        hue_to_channel(low, high, h - 1.0 / 3.0),
    ]
}

fn hue_to_channel(low: f64, high: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        low + (high - low) * 6.0 * t
    } else if t < 0.5 {
        high
    } else if t < 2.0 / 3.0 {
        low + (high - low) * 6.0 * (2.0 / 3.0 - t)
    } else {
        low
    }
}

/// Pump up saturation and lightness so planets still pop under distant lighting.
pub fn boost(color: u32) -> u32 {
    let [h, s, l] = rgb_to_hsl(unpack(color));
    let s = (s * 1.4 + 0.05).min(1.0);
    let l = (l * 1.1 + 0.02).min(0.9);
    pack(hsl_to_rgb([h, s, l]))
}
