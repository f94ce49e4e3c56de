#![allow(dead_code)]

use redux::{Color, Image};

/// Deterministic pseudo-random image, so tests never depend on an external RNG.
pub fn noise_image(width: usize, height: usize, seed: u64) -> Image {
    let mut state = seed;
    let mut next = || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 33) % 256) as f64
    };
    let colors: Vec<_> = (0..width * height)
        .map(|_| Color::new(next(), next(), next()))
        .collect();
    Image::from_colors(width, height, colors)
}

pub fn gray_image(width: usize, height: usize, values: &[f64]) -> Image {
    Image::from_colors(width, height, values.iter().map(|&x| Color::new(x, x, x)))
}

pub fn ppm_text(image: &Image) -> String {
    let mut output = vec![];
    image.write(&mut output).expect("writing to a Vec cannot fail");
    String::from_utf8(output).expect("PPM output is ASCII")
}
