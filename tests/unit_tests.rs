use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use imageproc::point::Point;

use nucls2crops::config::validate_extension;
use nucls2crops::crop::{crop_polygon, crop_rectangle};
use nucls2crops::geometry::{
    clamp_box, clamp_to_dimension, mask_bounding_box, parse_coordinate_list, parse_polygon,
};
use nucls2crops::io::collect_image_files;
use nucls2crops::raster::rasterize_polygon;
use nucls2crops::rename::slide_prefix;
use nucls2crops::report::render_report;
use nucls2crops::types::{AnnotationKind, AnnotationRow, PixelBox};
use nucls2crops::{CellType, CoordinateError, CountsTable, OrganizeError, Task};

fn gradient_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([x as u8, y as u8, 128])
    }))
}

fn foreground_count(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| p[0] != 0).count()
}

#[test]
fn test_cell_type_parsing() {
    assert_eq!("tumor".parse::<CellType>().unwrap(), CellType::Tumor);
    assert_eq!(
        "vascular_endothelium".parse::<CellType>().unwrap(),
        CellType::VascularEndothelium
    );
    for cell_type in CellType::ALL {
        assert_eq!(cell_type.as_str().parse::<CellType>().unwrap(), cell_type);
    }
    assert!(matches!(
        "Tumor".parse::<CellType>(),
        Err(OrganizeError::UnknownCellType(label)) if label == "Tumor"
    ));
    assert!("".parse::<CellType>().is_err());
}

#[test]
fn test_annotation_kind_parsing() {
    assert_eq!(
        "rectangle".parse::<AnnotationKind>().unwrap(),
        AnnotationKind::Rectangle
    );
    assert_eq!(
        "polyline".parse::<AnnotationKind>().unwrap(),
        AnnotationKind::Polyline
    );
    assert!(matches!(
        "circle".parse::<AnnotationKind>(),
        Err(OrganizeError::UnknownAnnotationType(kind)) if kind == "circle"
    ));
}

#[test]
fn test_rectangle_fields() {
    let row = AnnotationRow {
        raw_classification: "tumor".to_string(),
        kind: "rectangle".to_string(),
        xmin: Some(-5.5),
        ymin: Some(10.0),
        xmax: Some(50.9),
        ymax: Some(200.0),
        ..Default::default()
    };
    assert_eq!(row.rectangle().unwrap(), (-5, 10, 50, 200));

    let missing = AnnotationRow {
        xmax: None,
        ..row
    };
    assert!(matches!(
        missing.rectangle(),
        Err(OrganizeError::MissingGeometry("xmax"))
    ));
}

#[test]
fn test_clamp_to_dimension() {
    assert_eq!(clamp_to_dimension(-5, 100), 0);
    assert_eq!(clamp_to_dimension(50, 100), 50);
    assert_eq!(clamp_to_dimension(100, 100), 99);
    assert_eq!(clamp_to_dimension(200, 100), 99);
    assert_eq!(clamp_to_dimension(7, 0), 0);
}

#[test]
fn test_clamp_box() {
    let window = clamp_box(-5, 10, 50, 200, (100, 100)).unwrap();
    assert_eq!(window, PixelBox::new(0, 10, 50, 99));
    assert_eq!(window.width(), 50);
    assert_eq!(window.height(), 89);

    // inverted box
    assert!(matches!(
        clamp_box(60, 10, 40, 20, (100, 100)),
        Err(OrganizeError::DegenerateBox { .. })
    ));
    // entirely outside collapses onto the last pixel
    assert!(matches!(
        clamp_box(150, 150, 200, 200, (100, 100)),
        Err(OrganizeError::DegenerateBox { .. })
    ));
}

#[test]
fn test_parse_coordinates() {
    assert_eq!(parse_coordinate_list(" 1, 2,3 ", 'x').unwrap(), vec![1, 2, 3]);
    assert_eq!(parse_coordinate_list("-4", 'y').unwrap(), vec![-4]);
    assert_eq!(
        parse_coordinate_list("1,a", 'x'),
        Err(CoordinateError::InvalidToken {
            axis: 'x',
            token: "a".to_string()
        })
    );
    assert_eq!(
        parse_coordinate_list("1.5", 'y'),
        Err(CoordinateError::InvalidToken {
            axis: 'y',
            token: "1.5".to_string()
        })
    );
    assert_eq!(
        parse_coordinate_list("  ", 'x'),
        Err(CoordinateError::Empty { axis: 'x' })
    );

    assert_eq!(
        parse_polygon("10,20,20,10", "10,10,20,20").unwrap(),
        vec![(10, 10), (20, 10), (20, 20), (10, 20)]
    );
    assert_eq!(
        parse_polygon("1,2,3", "1,2"),
        Err(CoordinateError::LengthMismatch { xs: 3, ys: 2 })
    );
}

#[test]
fn test_rasterize_square() {
    let square = [
        Point::new(10, 10),
        Point::new(20, 10),
        Point::new(20, 20),
        Point::new(10, 20),
    ];
    let mask = rasterize_polygon(100, 100, &square, 255);

    assert_eq!(mask.dimensions(), (100, 100));
    assert_eq!(foreground_count(&mask), 11 * 11);
    assert_eq!(mask_bounding_box(&mask), Some(PixelBox::new(10, 10, 20, 20)));
    assert_eq!(mask.get_pixel(15, 15), &Luma([255]));
    assert_eq!(mask.get_pixel(9, 15), &Luma([0]));
}

#[test]
fn test_rasterize_triangle() {
    let triangle = [Point::new(0, 0), Point::new(10, 0), Point::new(0, 10)];
    let mask = rasterize_polygon(20, 20, &triangle, 1);

    assert_eq!(mask.get_pixel(2, 2), &Luma([1]));
    assert_eq!(mask.get_pixel(0, 10), &Luma([1]));
    assert_eq!(mask.get_pixel(9, 9), &Luma([0]));
    assert_eq!(mask.get_pixel(15, 15), &Luma([0]));
}

#[test]
fn test_rasterize_single_point() {
    let mask = rasterize_polygon(50, 50, &[Point::new(5, 7)], 255);
    assert_eq!(foreground_count(&mask), 1);
    assert_eq!(mask_bounding_box(&mask), Some(PixelBox::new(5, 7, 5, 7)));
}

#[test]
fn test_mask_bounding_box_empty() {
    assert_eq!(mask_bounding_box(&GrayImage::new(10, 10)), None);
}

#[test]
fn test_crop_rectangle_is_clamped() {
    let image = gradient_image(100, 100);
    let (crop, window) = crop_rectangle(&image, (-5, 10, 50, 200), (100, 100)).unwrap();

    assert_eq!((crop.width(), crop.height()), (50, 89));
    assert_eq!(window, PixelBox::new(0, 10, 50, 99));
    assert_eq!(crop.to_rgb8().get_pixel(0, 0), &Rgb([0, 10, 128]));
}

#[test]
fn test_crop_rectangle_never_exceeds_image() {
    let image = gradient_image(64, 48);
    for corners in [(-100, -100, 500, 500), (10, -3, 70, 20), (-1, 5, 63, 47)] {
        let (crop, _) = crop_rectangle(&image, corners, (64, 48)).unwrap();
        assert!(crop.width() <= 64 && crop.height() <= 48);
    }
}

#[test]
fn test_crop_polygon_is_tight() {
    let image = gradient_image(100, 100);
    let vertices = parse_polygon("10,20,20,10", "10,10,20,20").unwrap();
    let crop = crop_polygon(&image, &vertices, (100, 100)).unwrap();

    assert_eq!(crop.window, PixelBox::new(10, 10, 20, 20));
    assert_eq!((crop.image.width(), crop.image.height()), (10, 10));
    assert_eq!(crop.mask.dimensions(), (10, 10));
    assert_eq!(foreground_count(&crop.mask), 100);
    assert_eq!(crop.image.to_rgb8().get_pixel(0, 0), &Rgb([10, 10, 128]));
}

#[test]
fn test_crop_polygon_triangle_fills_crop_edges() {
    let image = gradient_image(100, 100);
    let vertices = parse_polygon("30,60,45", "20,25,70").unwrap();
    let crop = crop_polygon(&image, &vertices, (100, 100)).unwrap();
    let (width, height) = crop.mask.dimensions();

    let row_has_fg = |y: u32| (0..width).any(|x| crop.mask.get_pixel(x, y)[0] != 0);
    let col_has_fg = |x: u32| (0..height).any(|y| crop.mask.get_pixel(x, y)[0] != 0);
    assert!(row_has_fg(0));
    assert!(row_has_fg(height - 1));
    assert!(col_has_fg(0));
    assert!(col_has_fg(width - 1));
}

#[test]
fn test_crop_polygon_drops_pixels_on_excluded_edge() {
    let image = gradient_image(64, 64);
    let vertices = [(76, 4), (16, 37), (42, 15)];
    let crop = crop_polygon(&image, &vertices, (64, 64)).unwrap();
    let (width, height) = crop.mask.dimensions();

    // (76,4) clamps to (63,4), the only pixel of row 4, and column 63 is not part of the crop
    assert_eq!(crop.window, PixelBox::new(16, 4, 63, 37));
    assert_eq!((width, height), (47, 33));
    assert!((0..width).all(|x| crop.mask.get_pixel(x, 0)[0] == 0));
    assert!((0..height).all(|y| crop.mask.get_pixel(0, y)[0] == 0));
    assert!(foreground_count(&crop.mask) > 0);
}

#[test]
fn test_short_polygons_are_rasterized() {
    assert_eq!(parse_polygon("5", "7").unwrap(), vec![(5, 7)]);

    let image = gradient_image(100, 100);
    let line = parse_polygon("10,20", "10,20").unwrap();
    let crop = crop_polygon(&image, &line, (100, 100)).unwrap();
    assert_eq!(crop.window, PixelBox::new(10, 10, 20, 20));
    assert_eq!(foreground_count(&crop.mask), 10);
}

#[test]
fn test_collect_image_files_ignores_extension_case() {
    let temp_dir = tempfile::tempdir().unwrap();
    for name in ["a.PNG", "b.png", "c.tif"] {
        std::fs::write(temp_dir.path().join(name), b"").unwrap();
    }

    let images = collect_image_files(temp_dir.path(), "png").unwrap();
    let names: Vec<_> = images
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["a.PNG".to_string(), "b.png".to_string()]);
}

#[test]
fn test_crop_polygon_outside_image_is_skipped() {
    let image = gradient_image(100, 100);
    let vertices = [(150, 150), (200, 150), (200, 200)];
    let result = crop_polygon(&image, &vertices, (100, 100));
    assert!(matches!(
        result,
        Err(OrganizeError::DegenerateBox { .. }) | Err(OrganizeError::EmptyPolygonMask)
    ));

    // collapses onto the left border as a vertical line
    let border = [(-5, 50), (-5, 60), (-10, 70)];
    assert!(crop_polygon(&image, &border, (100, 100)).is_err());
}

#[test]
fn test_counts_table() {
    let mut counts = CountsTable::new();
    assert!(counts.is_empty());

    counts.increment(Task::ObjectDetection, CellType::Tumor);
    counts.increment(Task::ObjectDetection, CellType::Tumor);
    counts.increment(Task::SemanticSegmentation, CellType::Lymphocyte);

    assert_eq!(counts.get(Task::ObjectDetection, CellType::Tumor), 2);
    assert_eq!(counts.get(Task::ObjectDetection, CellType::Lymphocyte), 0);
    assert_eq!(counts.task_total(Task::ObjectDetection), 2);
    assert_eq!(counts.total(), 3);

    let mut other = CountsTable::new();
    other.increment(Task::ObjectDetection, CellType::Tumor);
    other.increment(Task::ObjectDetection, CellType::Fibroblast);
    counts.merge(&other);

    assert_eq!(counts.get(Task::ObjectDetection, CellType::Tumor), 3);
    assert_eq!(
        counts.entries(Task::ObjectDetection).collect::<Vec<_>>(),
        vec![(CellType::Fibroblast, 1), (CellType::Tumor, 3)]
    );
}

#[test]
fn test_render_report() {
    let mut counts = CountsTable::new();
    counts.increment(Task::ObjectDetection, CellType::Unlabeled);
    counts.increment(Task::ObjectDetection, CellType::Fibroblast);
    counts.increment(Task::ObjectDetection, CellType::Fibroblast);
    counts.increment(Task::SemanticSegmentation, CellType::Lymphocyte);

    let expected = "Dataset Summary\n\
                    ================\n\
                    \n\
                    Object Detection (rectangular bounding boxes):\n\
                    - fibroblast: 2 images\n\
                    - unlabeled: 1 images\n\
                    \n\
                    Semantic Segmentation (polygon masks):\n\
                    - lymphocyte: 1 images\n";
    assert_eq!(render_report(&counts), expected);
}

#[test]
fn test_render_report_empty_counts() {
    let report = render_report(&CountsTable::new());
    assert!(report.contains("Object Detection (rectangular bounding boxes):\n\n"));
    assert!(report.ends_with("Semantic Segmentation (polygon masks):\n"));
    assert!(!report.contains("- "));
}

#[test]
fn test_validate_extension() {
    assert_eq!(validate_extension("png").unwrap(), "png");
    assert_eq!(validate_extension("TIF").unwrap(), "TIF");
    assert!(validate_extension(".png").is_err());
    assert!(validate_extension("").is_err());
    assert!(validate_extension("p*g").is_err());
}

#[test]
fn test_slide_prefix() {
    assert_eq!(slide_prefix("TCGA-A1-A0SK_id-5ea40a88_left-0.png", "_id"), "TCGA-A1-A0SK");
    assert_eq!(slide_prefix("slideA.png", "_id"), "slideA.png");
}
