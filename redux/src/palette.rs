//! Nearest-color search and palette remapping.

use rayon::prelude::*;

use crate::color::{Color, Pixel};

/// Returns the index of the color in `palette` closest to `color`. Ties go to the lowest
/// index. Returns 0 for an empty palette.
pub fn find_closest(color: Color, palette: &[Color]) -> usize {
    find_closest_with_distance(color, palette).0
}

/// Like [`find_closest`], also returning the squared distance to the chosen color.
pub fn find_closest_with_distance(color: Color, palette: &[Color]) -> (usize, f64) {
    let (mut min_index, mut min_distance) = (0, f64::INFINITY);
    for (i, &candidate) in palette.iter().enumerate() {
        let distance = color.distance_squared(candidate);
        if distance < min_distance {
            min_distance = distance;
            min_index = i;
        }
    }
    (min_index, min_distance)
}

/// Finds the closest palette entry for every pixel, returning one palette index per pixel.
/// With `parallel` the search is spread across the rayon thread pool; the result is the same
/// either way.
pub fn assign(pixels: &[Pixel], palette: &[Color], parallel: bool) -> Vec<usize> {
    if parallel {
        pixels
            .par_iter()
            .map(|pixel| find_closest(pixel.color, palette))
            .collect()
    } else {
        pixels
            .iter()
            .map(|pixel| find_closest(pixel.color, palette))
            .collect()
    }
}

/// Substitutes every pixel with its closest palette color.
pub fn remap(pixels: &[Pixel], palette: &[Color], parallel: bool) -> Vec<Color> {
    assign(pixels, palette, parallel)
        .into_iter()
        .map(|index| palette[index])
        .collect()
}
