//! Most common color of an image.

use std::collections::HashMap;

use image::DynamicImage;
use image::imageops::FilterType;

use crate::domain::entities::HexColor;

/// Channel bucket width. Nearby shades fall into the same bucket.
pub const COLOR_DELTA: u16 = 24;

/// Longest edge the image is reduced to before counting.
const SAMPLE_EDGE: u32 = 150;

/// Alpha below which a pixel is ignored.
const MIN_ALPHA: u8 = 16;

/// Returns the most frequent quantized color of `img`, or `None` if every
/// pixel is transparent.
///
/// Ties resolve to the numerically smallest color so results are stable.
#[must_use]
pub fn most_common_color(img: &DynamicImage) -> Option<HexColor> {
    let sample = if img.width() > SAMPLE_EDGE || img.height() > SAMPLE_EDGE {
        img.resize(SAMPLE_EDGE, SAMPLE_EDGE, FilterType::Nearest)
    } else {
        img.clone()
    };

    let mut histogram: HashMap<[u8; 3], usize> = HashMap::new();
    for pixel in sample.to_rgba8().pixels() {
        let [r, g, b, a] = pixel.0;
        if a < MIN_ALPHA {
            continue;
        }
        *histogram
            .entry([quantize(r), quantize(g), quantize(b)])
            .or_default() += 1;
    }

    histogram
        .into_iter()
        .max_by(|(a_rgb, a_count), (b_rgb, b_count)| {
            a_count.cmp(b_count).then_with(|| b_rgb.cmp(a_rgb))
        })
        .map(|([r, g, b], _)| HexColor::from_rgb(r, g, b))
}

/// Rounds a channel to the nearest multiple of [`COLOR_DELTA`], saturating.
fn quantize(channel: u8) -> u8 {
    let channel = u16::from(channel);
    let bucket = (channel + COLOR_DELTA / 2) / COLOR_DELTA * COLOR_DELTA;
    u8::try_from(bucket).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_quantize() {
        assert_eq!(quantize(0), 0);
        assert_eq!(quantize(11), 0);
        assert_eq!(quantize(12), 24);
        assert_eq!(quantize(100), 96);
        assert_eq!(quantize(250), 255);
        assert_eq!(quantize(255), 255);
    }

    #[test]
    fn test_solid_image() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([255, 0, 0])));
        assert_eq!(most_common_color(&img).unwrap().digits(), "ff0000");
    }

    #[test]
    fn test_majority_wins_over_shades() {
        let img = RgbImage::from_fn(20, 20, |x, _| {
            if x < 14 {
                // Slightly varying blues land in one bucket.
                Rgb([0, 0, 190 + u8::try_from(x % 3).unwrap()])
            } else {
                Rgb([0, 255, 0])
            }
        });
        let color = most_common_color(&DynamicImage::ImageRgb8(img)).unwrap();
        assert_eq!(color.digits(), "0000c0");
    }

    #[test]
    fn test_large_image_is_sampled() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(800, 600, Rgb([48, 96, 144])));
        assert_eq!(most_common_color(&img).unwrap().digits(), "306090");
    }

    #[test]
    fn test_transparent_pixels_are_ignored() {
        let img = RgbaImage::from_fn(10, 10, |x, _| {
            if x < 8 {
                Rgba([255, 255, 255, 0])
            } else {
                Rgba([0, 0, 0, 255])
            }
        });
        let color = most_common_color(&DynamicImage::ImageRgba8(img)).unwrap();
        assert_eq!(color.digits(), "000000");

        let empty = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0])));
        assert_eq!(most_common_color(&empty), None);
    }
}
