//! Coordinate clamping, coordinate-list parsing and mask extents.

use image::GrayImage;
use imageproc::point::Point;

use crate::error::{CoordinateError, OrganizeError};
use crate::types::PixelBox;

/// Clamp `value` into `[0, dimension - 1]`.
///
/// A zero dimension clamps everything to 0.
pub fn clamp_to_dimension(value: i64, dimension: u32) -> u32 {
    let upper = i64::from(dimension.saturating_sub(1));
    value.clamp(0, upper) as u32
}

/// Clamp a rectangle to the image and return it as a half-open crop window.
///
/// The lower corner is clamped to `>= 0` and the upper corner to
/// `<= dimension - 1`. A window with no area after clamping is rejected.
pub fn clamp_box(
    x_min: i64,
    y_min: i64,
    x_max: i64,
    y_max: i64,
    (width, height): (u32, u32),
) -> Result<PixelBox, OrganizeError> {
    let clamped = PixelBox::new(
        clamp_to_dimension(x_min, width),
        clamp_to_dimension(y_min, height),
        clamp_to_dimension(x_max, width),
        clamp_to_dimension(y_max, height),
    );
    if clamped.is_empty() {
        return Err(OrganizeError::DegenerateBox {
            x_min: i64::from(clamped.x_min),
            y_min: i64::from(clamped.y_min),
            x_max: i64::from(clamped.x_max),
            y_max: i64::from(clamped.y_max),
        });
    }
    Ok(clamped)
}

/// Parse one comma-joined list of integer coordinates, e.g. `"10, 20,30"`.
pub fn parse_coordinate_list(raw: &str, axis: char) -> Result<Vec<i64>, CoordinateError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CoordinateError::Empty { axis });
    }
    raw.split(',')
        .map(|token| {
            let token = token.trim();
            token
                .parse::<i64>()
                .map_err(|_| CoordinateError::InvalidToken {
                    axis,
                    token: token.to_string(),
                })
        })
        .collect()
}

/// Parse the `coords_x` / `coords_y` pair of a polyline row into vertices.
pub fn parse_polygon(coords_x: &str, coords_y: &str) -> Result<Vec<(i64, i64)>, CoordinateError> {
    let xs = parse_coordinate_list(coords_x, 'x')?;
    let ys = parse_coordinate_list(coords_y, 'y')?;
    if xs.len() != ys.len() {
        return Err(CoordinateError::LengthMismatch {
            xs: xs.len(),
            ys: ys.len(),
        });
    }
    Ok(xs.into_iter().zip(ys).collect())
}

/// Clamp every vertex into the image, axis by axis.
pub fn clamp_vertices(vertices: &[(i64, i64)], (width, height): (u32, u32)) -> Vec<Point<i32>> {
    vertices
        .iter()
        .map(|&(x, y)| {
            Point::new(
                clamp_to_dimension(x, width) as i32,
                clamp_to_dimension(y, height) as i32,
            )
        })
        .collect()
}

/// Tight extent of the nonzero pixels of `mask`, with inclusive maxima.
///
/// Returns `None` when the mask has no foreground pixel.
pub fn mask_bounding_box(mask: &GrayImage) -> Option<PixelBox> {
    mask.enumerate_pixels()
        .filter(|(_, _, pixel)| pixel[0] != 0)
        .fold(None, |extent: Option<PixelBox>, (x, y, _)| {
            Some(match extent {
                None => PixelBox::new(x, y, x, y),
                Some(b) => PixelBox::new(
                    b.x_min.min(x),
                    b.y_min.min(y),
                    b.x_max.max(x),
                    b.y_max.max(y),
                ),
            })
        })
}
