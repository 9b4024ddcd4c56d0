//! Rectangle and polygon croppers.

use image::{DynamicImage, GrayImage};

use crate::error::OrganizeError;
use crate::geometry::{clamp_box, clamp_vertices, mask_bounding_box};
use crate::raster::rasterize_polygon;
use crate::types::{PixelBox, MASK_FOREGROUND};

/// A polygon crop: the image window and the matching slice of the instance mask.
#[derive(Debug, Clone)]
pub struct SegmentationCrop {
    pub image: DynamicImage,
    pub mask: GrayImage,
    pub window: PixelBox,
}

/// Crop an axis-aligned box out of `image` for object detection.
///
/// `bounds` is the (width, height) the box is clamped against, normally the
/// mask dimensions, which equal the image dimensions once the pair is loaded.
pub fn crop_rectangle(
    image: &DynamicImage,
    (x_min, y_min, x_max, y_max): (i64, i64, i64, i64),
    bounds: (u32, u32),
) -> Result<(DynamicImage, PixelBox), OrganizeError> {
    let window = clamp_box(x_min, y_min, x_max, y_max, bounds)?;
    Ok((crop_window(image, &window), window))
}

/// Rasterize a polygon into an instance mask and crop image and mask to it.
///
/// Fails with [`OrganizeError::EmptyPolygonMask`] when no pixel is set and
/// with [`OrganizeError::DegenerateBox`] when the mask extent has no area as
/// a half-open window (single points, horizontal or vertical lines).
pub fn crop_polygon(
    image: &DynamicImage,
    vertices: &[(i64, i64)],
    bounds: (u32, u32),
) -> Result<SegmentationCrop, OrganizeError> {
    let (width, height) = bounds;
    let points = clamp_vertices(vertices, bounds);
    let instance_mask = rasterize_polygon(width, height, &points, MASK_FOREGROUND);

    let extent = mask_bounding_box(&instance_mask).ok_or(OrganizeError::EmptyPolygonMask)?;
    if extent.is_empty() {
        return Err(OrganizeError::DegenerateBox {
            x_min: i64::from(extent.x_min),
            y_min: i64::from(extent.y_min),
            x_max: i64::from(extent.x_max),
            y_max: i64::from(extent.y_max),
        });
    }

    let mask = image::imageops::crop_imm(
        &instance_mask,
        extent.x_min,
        extent.y_min,
        extent.width(),
        extent.height(),
    )
    .to_image();

    Ok(SegmentationCrop {
        image: crop_window(image, &extent),
        mask,
        window: extent,
    })
}

fn crop_window(image: &DynamicImage, window: &PixelBox) -> DynamicImage {
    debug_assert!(window.x_max <= image.width() && window.y_max <= image.height());
    image.crop_imm(window.x_min, window.y_min, window.width(), window.height())
}
