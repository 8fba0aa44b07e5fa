use pekseg_core::ColorMode;
use pekseg_data::Rgb;

/// Three-entry palette cycled by the transition color mode: light blue,
/// light pink, white.
pub const TRANSITION_PALETTE: [Rgb; 3] = [
    Rgb::new(173, 216, 230),
    Rgb::new(255, 182, 193),
    Rgb::new(255, 255, 255),
];

/// Computes the target color for one foreground segment.
///
/// Pure in `(id, frame_count, mode)`; the frame counter is the sole time
/// basis for the animated modes, so replaying a byte stream reproduces the
/// exact same colors.
pub fn segment_color(id: u8, frame_count: u64, mode: ColorMode) -> Rgb {
    match mode {
        ColorMode::Static(rgb) => rgb,
        ColorMode::Rainbow => {
            let degrees = (u64::from(id) * 10 + frame_count * 5) % 360;
            hsv_to_rgb(degrees as f32 / 360.0, 1.0, 1.0)
        },
        ColorMode::Transition => {
            let index = (u64::from(id) + frame_count) % 3;
            TRANSITION_PALETTE[index as usize]
        },
    }
}

/// Recolors one sprite pixel toward `target`.
///
/// The pixel's Rec. 601 luminance becomes a brightness scale applied to the
/// target color channel-wise, so intra-segment shading gradients survive
/// recoloring. Alpha passes through untouched.
pub fn recolor(pixel: [u8; 4], target: Rgb) -> [u8; 4] {
    let [r, g, b, a] = pixel;
    let luminance =
        (299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b)) / 1000;

    [
        (luminance * u32::from(target.r) / 255) as u8,
        (luminance * u32::from(target.g) / 255) as u8,
        (luminance * u32::from(target.b) / 255) as u8,
        a,
    ]
}

/// HSV to RGB with all components in `[0, 1]`.
pub(crate) fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Rgb {
    let h = (h.fract() + 1.0).fract() * 6.0;
    let sector = h.floor() as u32 % 6;
    let f = h - h.floor();

    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let (r, g, b) = match sector {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    // truncating conversion; the deployed displays quantize this way
    Rgb::new((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}
