use image::{GrayImage, Rgb, RgbImage};

/// JET palette entry for an 8-bit intensity: dark blue at 0, through cyan and
/// yellow, to dark red at 255.
pub fn jet(value: u8) -> Rgb<u8> {
    let x = value as f32 / 255.0;
    let channel = |center: f32| {
        let c = (1.5 - (4.0 * x - center).abs()).clamp(0.0, 1.0);
        (c * 255.0).round() as u8
    };

    Rgb([channel(3.0), channel(2.0), channel(1.0)])
}

pub fn apply_jet(intensity: &GrayImage) -> RgbImage {
    let lut: Vec<Rgb<u8>> = (0..=255).map(jet).collect();

    RgbImage::from_fn(intensity.width(), intensity.height(), |x, y| {
        lut[intensity.get_pixel(x, y)[0] as usize]
    })
}
