//! Region color analysis.
//!
//! Samples a rectangular sub-region of an RGBA pixel buffer and derives
//! background/foreground color estimates, a WCAG contrast ratio, perceptual
//! luma, and edge density. The sampling stride grows with region area so the
//! cost stays bounded, and colors are quantized to 4 bits per channel
//! (4096 histogram buckets) for dominant-color extraction.
//!
//! All outputs are rounded to a fixed precision so serialized results are
//! stable across runs. Analysis is fully deterministic.

use serde::{Deserialize, Serialize};

use crate::constants::analysis::{
    COARSE_AREA, DOMINANT_COUNT, EDGE_THRESHOLD, FG_DISTANCE, MEDIUM_AREA,
};
use crate::geometry::BBox;

/// A borrowed view over a decoded RGBA8 pixel buffer.
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    width: u32,
    height: u32,
    data: &'a [u8],
}

impl<'a> PixelBuffer<'a> {
    /// Wrap a raw RGBA8 buffer. Returns None if the buffer length does not
    /// match `width * height * 4`.
    pub fn new(data: &'a [u8], width: u32, height: u32) -> Option<Self> {
        if data.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// An empty buffer. Any analysis against it yields no result.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            data: &[],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn rgb_at(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        (self.data[idx], self.data[idx + 1], self.data[idx + 2])
    }
}

/// Result of analyzing one region.
///
/// All colors are `#rrggbb` hex strings; fractional fields are rounded to
/// 6 decimal places and the contrast ratio to 4, for serialization stability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionAnalysis {
    /// Mean RGB over all samples.
    pub average_color: String,
    /// Up to 8 most frequent quantized colors, dequantized to bucket midpoints.
    pub dominant_colors: Vec<String>,
    /// The single most frequent quantized color.
    pub suggested_bg_color: String,
    /// The most frequent color sufficiently far from the background, or the
    /// background's bitwise complement when none qualifies.
    pub suggested_fg_color: String,
    /// Mean perceptual luma, normalized to [0, 1].
    pub avg_luma: f64,
    /// WCAG contrast ratio between the suggested colors, in [1, 21].
    pub contrast_ratio: f64,
    /// Fraction of samples forming an edge against their row predecessor.
    pub edge_density: f64,
    /// Sampling stride used (2, 3, or 4 by region area).
    pub sample_step: u32,
}

/// Analyze a region of the pixel buffer.
///
/// Returns None when the region has zero area or the buffer is unavailable;
/// callers keep the prior analysis (or none) in that case.
pub fn analyze(pixels: &PixelBuffer<'_>, bbox: BBox) -> Option<RegionAnalysis> {
    if pixels.width == 0 || pixels.height == 0 {
        return None;
    }
    let bbox = bbox.clamped(pixels.width, pixels.height);
    if bbox.area() == 0 {
        return None;
    }

    let step = sample_step(bbox.area());

    let mut hist = vec![0u32; 4096];
    let (mut sum_r, mut sum_g, mut sum_b) = (0u64, 0u64, 0u64);
    let mut luma_sum = 0.0f64;
    let mut samples = 0u64;
    let mut edges = 0u64;

    let mut y = bbox.y;
    while y < bbox.y + bbox.h {
        let mut prev: Option<(u8, u8, u8)> = None;
        let mut x = bbox.x;
        while x < bbox.x + bbox.w {
            let (r, g, b) = pixels.rgb_at(x, y);
            sum_r += u64::from(r);
            sum_g += u64::from(g);
            sum_b += u64::from(b);
            luma_sum += (0.2126 * f64::from(r) + 0.7152 * f64::from(g) + 0.0722 * f64::from(b))
                / 255.0;
            hist[quantize(r, g, b) as usize] += 1;

            if let Some(p) = prev {
                if manhattan(p, (r, g, b)) > EDGE_THRESHOLD {
                    edges += 1;
                }
            }
            prev = Some((r, g, b));
            samples += 1;
            x += step;
        }
        y += step;
    }

    debug_assert!(samples > 0);

    // Dominant buckets by frequency; bucket index breaks ties so the
    // ordering is deterministic.
    let mut buckets: Vec<(u16, u32)> = hist
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .map(|(bucket, &count)| (bucket as u16, count))
        .collect();
    buckets.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let dominant: Vec<(u8, u8, u8)> = buckets
        .iter()
        .take(DOMINANT_COUNT)
        .map(|&(bucket, _)| dequantize(bucket))
        .collect();

    let bg = dominant[0];
    let fg = buckets
        .iter()
        .map(|&(bucket, _)| dequantize(bucket))
        .find(|&c| manhattan(c, bg) > FG_DISTANCE)
        .unwrap_or((255 - bg.0, 255 - bg.1, 255 - bg.2));

    let avg = (
        div_round(sum_r, samples),
        div_round(sum_g, samples),
        div_round(sum_b, samples),
    );

    Some(RegionAnalysis {
        average_color: hex(avg),
        dominant_colors: dominant.into_iter().map(hex).collect(),
        suggested_bg_color: hex(bg),
        suggested_fg_color: hex(fg),
        avg_luma: round6(luma_sum / samples as f64),
        contrast_ratio: round4(contrast_ratio(bg, fg)),
        edge_density: round6(edges as f64 / samples as f64),
        sample_step: step,
    })
}

/// Sampling stride for a region of the given area.
fn sample_step(area: u64) -> u32 {
    if area > COARSE_AREA {
        4
    } else if area > MEDIUM_AREA {
        3
    } else {
        2
    }
}

/// Quantize an RGB triple to a 4-bit-per-channel bucket index (0..4096).
fn quantize(r: u8, g: u8, b: u8) -> u16 {
    (u16::from(r >> 4) << 8) | (u16::from(g >> 4) << 4) | u16::from(b >> 4)
}

/// Dequantize a bucket index back to a representative RGB (bucket midpoint).
fn dequantize(bucket: u16) -> (u8, u8, u8) {
    let r = ((bucket >> 8) & 0xF) as u8;
    let g = ((bucket >> 4) & 0xF) as u8;
    let b = (bucket & 0xF) as u8;
    (r * 16 + 8, g * 16 + 8, b * 16 + 8)
}

fn manhattan(a: (u8, u8, u8), b: (u8, u8, u8)) -> u32 {
    a.0.abs_diff(b.0) as u32 + a.1.abs_diff(b.1) as u32 + a.2.abs_diff(b.2) as u32
}

fn div_round(sum: u64, count: u64) -> u8 {
    ((sum + count / 2) / count) as u8
}

fn hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// WCAG relative luminance of an sRGB color.
fn relative_luminance((r, g, b): (u8, u8, u8)) -> f64 {
    fn linearize(c: u8) -> f64 {
        let c = f64::from(c) / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    0.2126 * linearize(r) + 0.7152 * linearize(g) + 0.0722 * linearize(b)
}

/// WCAG contrast ratio between two colors, always in [1, 21].
pub fn contrast_ratio(a: (u8, u8, u8), b: (u8, u8, u8)) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    (la.max(lb) + 0.05) / (la.min(lb) + 0.05)
}

/// Round to 6 decimal places (fractional outputs).
pub fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

/// Round to 4 decimal places (contrast ratio).
pub fn round4(x: f64) -> f64 {
    (x * 1e4).round() / 1e4
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a solid-color RGBA buffer.
    fn solid(width: u32, height: u32, rgb: (u8, u8, u8)) -> Vec<u8> {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..width * height {
            data.extend_from_slice(&[rgb.0, rgb.1, rgb.2, 255]);
        }
        data
    }

    /// Left half one color, right half another.
    fn split(width: u32, height: u32, left: (u8, u8, u8), right: (u8, u8, u8)) -> Vec<u8> {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..height {
            for x in 0..width {
                let c = if x < width / 2 { left } else { right };
                data.extend_from_slice(&[c.0, c.1, c.2, 255]);
            }
        }
        data
    }

    #[test]
    fn test_solid_red_region() {
        let data = solid(800, 600, (255, 0, 0));
        let px = PixelBuffer::new(&data, 800, 600).unwrap();
        let result = analyze(&px, BBox::new(10, 10, 100, 50)).unwrap();

        assert_eq!(result.average_color, "#ff0000");
        // Background is the quantized-red bucket midpoint.
        assert_eq!(result.suggested_bg_color, "#f80808");
        // No second bucket exists, so foreground falls back to the complement.
        assert_eq!(result.suggested_fg_color, "#07f7f7");
        assert_eq!(result.edge_density, 0.0);
        assert_eq!(result.sample_step, 2);
        assert!(result.contrast_ratio >= 1.0 && result.contrast_ratio <= 21.0);
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let data = split(200, 200, (255, 255, 255), (0, 0, 0));
        let px = PixelBuffer::new(&data, 200, 200).unwrap();
        let bbox = BBox::new(20, 20, 150, 150);
        let a = analyze(&px, bbox).unwrap();
        let b = analyze(&px, bbox).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_area_returns_none() {
        let data = solid(10, 10, (1, 2, 3));
        let px = PixelBuffer::new(&data, 10, 10).unwrap();
        assert!(analyze(&px, BBox::new(5, 5, 0, 0)).is_none());
    }

    #[test]
    fn test_empty_buffer_returns_none() {
        let px = PixelBuffer::empty();
        assert!(analyze(&px, BBox::new(0, 0, 100, 100)).is_none());
    }

    #[test]
    fn test_sample_step_by_area() {
        assert_eq!(sample_step(100), 2);
        assert_eq!(sample_step(120_000), 2);
        assert_eq!(sample_step(120_001), 3);
        assert_eq!(sample_step(260_000), 3);
        assert_eq!(sample_step(260_001), 4);
    }

    #[test]
    fn test_edge_density_on_contrasting_halves() {
        // One white/black boundary per sampled row.
        let data = split(100, 100, (255, 255, 255), (0, 0, 0));
        let px = PixelBuffer::new(&data, 100, 100).unwrap();
        let result = analyze(&px, BBox::new(0, 0, 100, 100)).unwrap();
        assert!(result.edge_density > 0.0);
        assert!(result.edge_density < 0.1);
    }

    #[test]
    fn test_foreground_picked_from_second_bucket() {
        let data = split(100, 100, (250, 250, 250), (10, 10, 10));
        let px = PixelBuffer::new(&data, 100, 100).unwrap();
        let result = analyze(&px, BBox::new(0, 0, 100, 100)).unwrap();
        // Both halves equally frequent; bucket order breaks the tie, so
        // the dark bucket (lower index) is background and the light one
        // qualifies as foreground.
        assert_eq!(result.suggested_bg_color, "#080808");
        assert_eq!(result.suggested_fg_color, "#f8f8f8");
        assert!(result.contrast_ratio > 10.0);
    }

    #[test]
    fn test_contrast_ratio_bounds() {
        let pairs = [
            ((0, 0, 0), (255, 255, 255)),
            ((255, 255, 255), (255, 255, 255)),
            ((255, 0, 0), (0, 255, 255)),
            ((17, 93, 201), (240, 180, 20)),
        ];
        for (a, b) in pairs {
            let ratio = contrast_ratio(a, b);
            assert!(ratio >= 1.0 && ratio <= 21.0, "ratio {} out of range", ratio);
        }
        // Extremes.
        assert!((contrast_ratio((0, 0, 0), (255, 255, 255)) - 21.0).abs() < 0.01);
        assert!((contrast_ratio((120, 40, 200), (120, 40, 200)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_quantize_roundtrip_midpoint() {
        assert_eq!(dequantize(quantize(255, 0, 0)), (248, 8, 8));
        assert_eq!(dequantize(quantize(8, 8, 8)), (8, 8, 8));
        assert_eq!(quantize(255, 255, 255), 4095);
    }

    #[test]
    fn test_dominant_colors_capped_at_eight() {
        // A vertical rainbow of 16 distinct buckets.
        let mut data = Vec::new();
        for y in 0..16u32 {
            for _ in 0..16u32 {
                let v = (y * 16 + 8) as u8;
                data.extend_from_slice(&[v, 0, 0, 255]);
            }
        }
        let px = PixelBuffer::new(&data, 16, 16).unwrap();
        let result = analyze(&px, BBox::new(0, 0, 16, 16)).unwrap();
        assert!(result.dominant_colors.len() <= 8);
        assert!(!result.dominant_colors.is_empty());
    }

    #[test]
    fn test_dominant_colors_skip_empty_buckets() {
        // A single-color region occupies exactly one histogram bucket; the
        // other 4095 must not leak into the dominant list.
        let data = solid(20, 20, (255, 0, 0));
        let px = PixelBuffer::new(&data, 20, 20).unwrap();
        let result = analyze(&px, BBox::new(0, 0, 20, 20)).unwrap();
        assert_eq!(result.dominant_colors, vec!["#f80808".to_string()]);
    }

    #[test]
    fn test_pixel_buffer_rejects_bad_length() {
        let data = vec![0u8; 10];
        assert!(PixelBuffer::new(&data, 10, 10).is_none());
    }
}
