//! Polygon rasterization into binary instance masks.
//!
//! The interior is filled with an even-odd scanline pass and the outline is
//! drawn on top, so every vertex and edge pixel is foreground. Degenerate
//! polygons (a single point, collinear vertices, repeated closing vertex)
//! need no special handling: the scanline pass contributes nothing and the
//! outline still marks the touched pixels.

use image::{GrayImage, Luma};
use imageproc::drawing::draw_line_segment_mut;
use imageproc::point::Point;

/// Rasterize `vertices` onto a blank `width` x `height` canvas.
///
/// Vertices are expected to lie inside the canvas already. Pixels covered by
/// the polygon get `value`, everything else stays 0.
pub fn rasterize_polygon(
    width: u32,
    height: u32,
    vertices: &[Point<i32>],
    value: u8,
) -> GrayImage {
    let mut canvas = GrayImage::new(width, height);
    if vertices.is_empty() || width == 0 || height == 0 {
        return canvas;
    }
    fill_interior(&mut canvas, vertices, value);
    draw_outline(&mut canvas, vertices, value);
    canvas
}

fn fill_interior(canvas: &mut GrayImage, vertices: &[Point<i32>], value: u8) {
    if vertices.len() < 3 {
        return;
    }
    let (width, height) = canvas.dimensions();
    let y_lo = vertices.iter().map(|p| p.y).min().unwrap_or(0).max(0);
    let y_hi = vertices
        .iter()
        .map(|p| p.y)
        .max()
        .unwrap_or(0)
        .min(height as i32 - 1);

    let mut crossings: Vec<f64> = Vec::with_capacity(vertices.len());
    for y in y_lo..=y_hi {
        crossings.clear();
        let scan = f64::from(y);
        for (i, &a) in vertices.iter().enumerate() {
            let b = vertices[(i + 1) % vertices.len()];
            if a.y == b.y {
                continue;
            }
            let (lo, hi) = if a.y < b.y { (a, b) } else { (b, a) };
            // half-open in y so a shared vertex is counted once
            if scan < f64::from(lo.y) || scan >= f64::from(hi.y) {
                continue;
            }
            let t = (scan - f64::from(lo.y)) / f64::from(hi.y - lo.y);
            crossings.push(f64::from(lo.x) + t * f64::from(hi.x - lo.x));
        }
        crossings.sort_by(|a, b| a.total_cmp(b));

        for span in crossings.chunks_exact(2) {
            let from = (span[0].ceil() as i64).max(0);
            let to = (span[1].floor() as i64).min(i64::from(width) - 1);
            for x in from..=to {
                canvas.put_pixel(x as u32, y as u32, Luma([value]));
            }
        }
    }
}

fn draw_outline(canvas: &mut GrayImage, vertices: &[Point<i32>], value: u8) {
    if let [only] = vertices {
        let (width, height) = canvas.dimensions();
        if only.x >= 0 && only.y >= 0 && (only.x as u32) < width && (only.y as u32) < height {
            canvas.put_pixel(only.x as u32, only.y as u32, Luma([value]));
        }
        return;
    }
    for (i, &a) in vertices.iter().enumerate() {
        let b = vertices[(i + 1) % vertices.len()];
        draw_line_segment_mut(
            canvas,
            (a.x as f32, a.y as f32),
            (b.x as f32, b.y as f32),
            Luma([value]),
        );
    }
}
