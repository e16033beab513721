// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Raster drawing primitives for the overlay: colors, fills, strokes, text.

use ab_glyph::{Font, PxScale};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Pixel, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_text_mut, text_size};

/// Parse a CSS-style color.
///
/// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`, `rgba(r, g, b, a)`
/// (alpha in `[0, 1]`) and `transparent`.
pub fn parse_css_color(value: &str) -> Option<Rgba<u8>> {
    let value = value.trim().to_ascii_lowercase();

    if value == "transparent" {
        return Some(Rgba([0, 0, 0, 0]));
    }

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }

    let (args, has_alpha) = if let Some(rest) = value.strip_prefix("rgba(") {
        (rest.strip_suffix(')')?, true)
    } else if let Some(rest) = value.strip_prefix("rgb(") {
        (rest.strip_suffix(')')?, false)
    } else {
        return None;
    };

    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != if has_alpha { 4 } else { 3 } {
        return None;
    }

    let channel = |s: &str| -> Option<u8> {
        let v: f64 = s.parse().ok()?;
        (0.0..=255.0).contains(&v).then(|| v.round() as u8)
    };
    let alpha = if has_alpha {
        let a: f64 = parts[3].parse().ok()?;
        if !(0.0..=1.0).contains(&a) {
            return None;
        }
        (a * 255.0).round() as u8
    } else {
        255
    };

    Some(Rgba([
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ]))
}

fn parse_hex(hex: &str) -> Option<Rgba<u8>> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => {
            let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);
            Some(Rgba([nibble(0)?, nibble(1)?, nibble(2)?, 255]))
        }
        6 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, 255])),
        8 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
        _ => None,
    }
}

/// Alpha-blend a rectangle over the image, clipped to its bounds.
pub fn fill_rect_blended(img: &mut RgbaImage, x: i64, y: i64, w: u32, h: u32, color: Rgba<u8>) {
    if color[3] == 0 {
        return;
    }
    let x0 = x.max(0) as u32;
    let y0 = y.max(0) as u32;
    let x1 = ((x + w as i64).max(0) as u32).min(img.width());
    let y1 = ((y + h as i64).max(0) as u32).min(img.height());

    for py in y0..y1 {
        for px in x0..x1 {
            img.get_pixel_mut(px, py).blend(&color);
        }
    }
}

/// Stroke a polyline with round joins and caps.
pub fn stroke_polyline(img: &mut RgbaImage, points: &[(f64, f64)], width: f64, color: Rgba<u8>) {
    let radius = (width / 2.0).round().max(1.0) as i32;

    for center in stamp_centers(points, radius) {
        draw_filled_circle_mut(img, center, radius, color);
    }
}

/// Circle centers covering every segment, spaced half a radius apart.
///
/// Consecutive duplicates are skipped, so the count is bounded by the path
/// length divided by the spacing plus one stamp per point.
fn stamp_centers(points: &[(f64, f64)], radius: i32) -> Vec<(i32, i32)> {
    let spacing = (radius as f64 / 2.0).max(1.0);
    let mut centers: Vec<(i32, i32)> = Vec::new();
    let mut push = |x: f64, y: f64| {
        let center = (x.round() as i32, y.round() as i32);
        if centers.last() != Some(&center) {
            centers.push(center);
        }
    };

    if let Some(&(x, y)) = points.first() {
        push(x, y);
    }
    for pair in points.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        let length = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
        let steps = (length / spacing).ceil().max(1.0) as usize;

        for step in 1..=steps {
            let t = step as f64 / steps as f64;
            push(x0 + (x1 - x0) * t, y0 + (y1 - y0) * t);
        }
    }
    centers
}

/// Filled dot centered on a point.
pub fn draw_dot(img: &mut RgbaImage, center: (f64, f64), radius: f64, color: Rgba<u8>) {
    draw_filled_circle_mut(
        img,
        (center.0.round() as i32, center.1.round() as i32),
        radius.round() as i32,
        color,
    );
}

/// Rendered width of `text` in pixels.
pub fn text_width(font: &impl Font, px: f32, text: &str) -> u32 {
    text_size(PxScale::from(px), font, text).0
}

/// Draw `text` horizontally centered on `center_x`, top edge at `y`.
pub fn draw_text_centered(
    img: &mut RgbaImage,
    font: &impl Font,
    px: f32,
    center_x: f64,
    y: i64,
    text: &str,
    color: Rgba<u8>,
) {
    let width = text_width(font, px, text) as f64;
    let x = (center_x - width / 2.0).round() as i32;
    draw_text_mut(img, color, x, y as i32, PxScale::from(px), font, text);
}

/// Scale an image to cover `width` x `height` and crop the center.
///
/// The crop is taken from the source before resizing, so memory use is
/// bounded by the source and output sizes whatever the aspect ratio.
pub fn cover_fit(source: DynamicImage, width: u32, height: u32) -> RgbaImage {
    let (src_w, src_h) = (source.width() as u64, source.height() as u64);
    let (dst_w, dst_h) = (width.max(1) as u64, height.max(1) as u64);

    let crop_w = src_w.min(src_h * dst_w / dst_h).max(1);
    let crop_h = src_h.min(src_w * dst_h / dst_w).max(1);
    let left = src_w.saturating_sub(crop_w) / 2;
    let top = src_h.saturating_sub(crop_h) / 2;

    let cropped = imageops::crop_imm(
        &source,
        left as u32,
        top as u32,
        crop_w as u32,
        crop_h as u32,
    )
    .to_image();
    imageops::resize(&cropped, width, height, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(parse_css_color("#1a1a1a"), Some(Rgba([26, 26, 26, 255])));
        assert_eq!(parse_css_color("#FFF"), Some(Rgba([255, 255, 255, 255])));
        assert_eq!(parse_css_color("#ff000080"), Some(Rgba([255, 0, 0, 128])));
        assert_eq!(parse_css_color("#12345"), None);
        assert_eq!(parse_css_color("#gggggg"), None);
    }

    #[test]
    fn test_parse_functional_colors() {
        assert_eq!(
            parse_css_color("rgba(255, 255, 255, 0.9)"),
            Some(Rgba([255, 255, 255, 230]))
        );
        assert_eq!(parse_css_color("rgb(59,130,246)"), Some(Rgba([59, 130, 246, 255])));
        assert_eq!(parse_css_color("transparent"), Some(Rgba([0, 0, 0, 0])));
        assert_eq!(parse_css_color("rgba(0, 0, 0, 2)"), None);
        assert_eq!(parse_css_color("rgb(300, 0, 0)"), None);
        assert_eq!(parse_css_color("hsl(10, 20%, 30%)"), None);
    }

    #[test]
    fn test_fill_rect_blended_clips_and_blends() {
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        fill_rect_blended(&mut img, -2, -2, 4, 4, Rgba([255, 255, 255, 128]));

        let inside = img.get_pixel(0, 0);
        assert!(inside[0] > 100 && inside[0] < 160, "got {:?}", inside);
        assert_eq!(inside[3], 255);
        assert_eq!(img.get_pixel(3, 3), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_stroke_polyline_covers_path() {
        let mut img = RgbaImage::new(50, 50);
        let red = Rgba([255, 0, 0, 255]);
        stroke_polyline(&mut img, &[(5.0, 5.0), (45.0, 5.0), (45.0, 45.0)], 4.0, red);

        assert_eq!(img.get_pixel(25, 5), &red);
        assert_eq!(img.get_pixel(45, 25), &red);
        assert_eq!(img.get_pixel(25, 25)[3], 0);
    }

    #[test]
    fn test_thick_stroke_has_no_gaps() {
        let mut img = RgbaImage::new(200, 60);
        let red = Rgba([255, 0, 0, 255]);
        stroke_polyline(&mut img, &[(10.0, 30.0), (190.0, 30.0)], 24.0, red);

        for x in 10..=190 {
            assert_eq!(img.get_pixel(x, 30), &red, "gap at x={}", x);
            assert_eq!(img.get_pixel(x, 20), &red, "gap at x={}", x);
            assert_eq!(img.get_pixel(x, 40), &red, "gap at x={}", x);
        }
    }

    #[test]
    fn test_stamp_count_bounded_by_spacing() {
        // Radius 12 stamps every 6 pixels
        let centers = stamp_centers(&[(0.0, 0.0), (1000.0, 0.0)], 12);
        assert!(centers.len() <= 1000 / 6 + 2, "{} stamps", centers.len());

        // Dense back-and-forth over the same pixels collapses duplicates
        let zigzag: Vec<(f64, f64)> = (0..10_000)
            .map(|i| (if i % 2 == 0 { 0.0 } else { 0.4 }, 0.0))
            .collect();
        assert_eq!(stamp_centers(&zigzag, 12), vec![(0, 0)]);
    }

    #[test]
    fn test_cover_fit_dimensions() {
        let wide = DynamicImage::ImageRgba8(RgbaImage::new(400, 100));
        let fitted = cover_fit(wide, 108, 192);
        assert_eq!(fitted.dimensions(), (108, 192));
    }

    #[test]
    fn test_cover_fit_extreme_aspect_ratio() {
        let red = Rgba([255, 0, 0, 255]);
        let sliver = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 100_000, red));

        let fitted = cover_fit(sliver, 1080, 1920);
        assert_eq!(fitted.dimensions(), (1080, 1920));
        assert_eq!(fitted.get_pixel(540, 960), &red);
    }

    #[test]
    fn test_cover_fit_crops_center() {
        // Left third blue, middle third green, right third blue
        let mut source = RgbaImage::from_pixel(300, 100, Rgba([0, 0, 255, 255]));
        for x in 100..200 {
            for y in 0..100 {
                source.put_pixel(x, y, Rgba([0, 255, 0, 255]));
            }
        }

        let fitted = cover_fit(DynamicImage::ImageRgba8(source), 50, 100);
        assert_eq!(fitted.get_pixel(25, 50), &Rgba([0, 255, 0, 255]));
    }
}
