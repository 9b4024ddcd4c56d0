use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::OrganizeError;

// Extension of the mask images and of every written artifact
pub const PNG_EXTENSION: &str = "png";

// Extension of the per-image annotation tables
pub const ANNOTATION_EXTENSION: &str = "csv";

// Name of the summary report written under the output root
pub const REPORT_FILE_NAME: &str = "README.txt";

// Foreground value burned into rasterized instance masks
pub const MASK_FOREGROUND: u8 = 255;

/// The fixed set of cell classifications an annotation row may carry.
///
/// The declaration order is the order used when listing cell types in the
/// summary report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CellType {
    Fibroblast,
    PlasmaCell,
    Tumor,
    Lymphocyte,
    Macrophage,
    MitoticFigure,
    VascularEndothelium,
    Myoepithelium,
    ApoptoticBody,
    Neutrophil,
    DuctalEpithelium,
    Eosinophil,
    Unlabeled,
}

impl CellType {
    pub const ALL: [CellType; 13] = [
        CellType::Fibroblast,
        CellType::PlasmaCell,
        CellType::Tumor,
        CellType::Lymphocyte,
        CellType::Macrophage,
        CellType::MitoticFigure,
        CellType::VascularEndothelium,
        CellType::Myoepithelium,
        CellType::ApoptoticBody,
        CellType::Neutrophil,
        CellType::DuctalEpithelium,
        CellType::Eosinophil,
        CellType::Unlabeled,
    ];

    /// Label as written in the annotation tables and used for directory names.
    pub fn as_str(self) -> &'static str {
        match self {
            CellType::Fibroblast => "fibroblast",
            CellType::PlasmaCell => "plasma_cell",
            CellType::Tumor => "tumor",
            CellType::Lymphocyte => "lymphocyte",
            CellType::Macrophage => "macrophage",
            CellType::MitoticFigure => "mitotic_figure",
            CellType::VascularEndothelium => "vascular_endothelium",
            CellType::Myoepithelium => "myoepithelium",
            CellType::ApoptoticBody => "apoptotic_body",
            CellType::Neutrophil => "neutrophil",
            CellType::DuctalEpithelium => "ductal_epithelium",
            CellType::Eosinophil => "eosinophil",
            CellType::Unlabeled => "unlabeled",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CellType {
    type Err = OrganizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellType::ALL
            .iter()
            .copied()
            .find(|cell_type| cell_type.as_str() == s)
            .ok_or_else(|| OrganizeError::UnknownCellType(s.to_string()))
    }
}

/// Training task an artifact is produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Task {
    ObjectDetection,
    SemanticSegmentation,
}

impl Task {
    pub const ALL: [Task; 2] = [Task::ObjectDetection, Task::SemanticSegmentation];

    /// Directory name of the task under the output root
    pub fn dir_name(self) -> &'static str {
        match self {
            Task::ObjectDetection => "object_detection",
            Task::SemanticSegmentation => "semantic_segmentation",
        }
    }

    /// Section heading used in the summary report
    pub fn report_heading(self) -> &'static str {
        match self {
            Task::ObjectDetection => "Object Detection (rectangular bounding boxes):",
            Task::SemanticSegmentation => "Semantic Segmentation (polygon masks):",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// The two kinds of files written per crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Image,
    Mask,
}

impl ArtifactKind {
    pub fn dir_name(self) -> &'static str {
        match self {
            ArtifactKind::Image => "images",
            ArtifactKind::Mask => "masks",
        }
    }

    pub fn file_prefix(self) -> &'static str {
        match self {
            ArtifactKind::Image => "image",
            ArtifactKind::Mask => "mask",
        }
    }
}

/// Geometry type of an annotation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    Rectangle,
    Polyline,
}

impl FromStr for AnnotationKind {
    type Err = OrganizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rectangle" => Ok(AnnotationKind::Rectangle),
            "polyline" => Ok(AnnotationKind::Polyline),
            other => Err(OrganizeError::UnknownAnnotationType(other.to_string())),
        }
    }
}

// One row of a per-image annotation table. Columns not listed here are ignored.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AnnotationRow {
    pub raw_classification: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub xmin: Option<f64>,
    #[serde(default)]
    pub ymin: Option<f64>,
    #[serde(default)]
    pub xmax: Option<f64>,
    #[serde(default)]
    pub ymax: Option<f64>,
    #[serde(default)]
    pub coords_x: Option<String>,
    #[serde(default)]
    pub coords_y: Option<String>,
}

impl AnnotationRow {
    /// The rectangle corners, truncated toward zero, if all four are present.
    pub fn rectangle(&self) -> Result<(i64, i64, i64, i64), OrganizeError> {
        let corner = |value: Option<f64>, name: &'static str| {
            value
                .filter(|v| v.is_finite())
                .map(|v| v.trunc() as i64)
                .ok_or(OrganizeError::MissingGeometry(name))
        };
        Ok((
            corner(self.xmin, "xmin")?,
            corner(self.ymin, "ymin")?,
            corner(self.xmax, "xmax")?,
            corner(self.ymax, "ymax")?,
        ))
    }
}

/// An axis-aligned pixel box. `x_max` and `y_max` are interpreted by the
/// caller: inclusive for mask extents, exclusive for crop windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBox {
    pub x_min: u32,
    pub y_min: u32,
    pub x_max: u32,
    pub y_max: u32,
}

impl PixelBox {
    pub fn new(x_min: u32, y_min: u32, x_max: u32, y_max: u32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Width of the half-open window `[x_min, x_max)`
    pub fn width(&self) -> u32 {
        self.x_max.saturating_sub(self.x_min)
    }

    /// Height of the half-open window `[y_min, y_max)`
    pub fn height(&self) -> u32 {
        self.y_max.saturating_sub(self.y_min)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

// Struct to hold processing statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub images_found: usize,
    pub images_processed: usize,
    pub skipped_missing_mask: usize,
    pub skipped_missing_annotation: usize,
    pub failed_images: usize,
    pub masks_resized: usize,
    pub rows_unknown_cell_type: usize,
    pub rows_unknown_annotation_type: usize,
    pub rows_empty_polygon: usize,
    pub rows_degenerate: usize,
    pub rows_malformed: usize,
    pub write_failures: usize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of annotation rows that did not produce an artifact
    pub fn rows_skipped(&self) -> usize {
        self.rows_unknown_cell_type
            + self.rows_unknown_annotation_type
            + self.rows_empty_polygon
            + self.rows_degenerate
            + self.rows_malformed
            + self.write_failures
    }

    pub fn print_summary(&self) {
        log::info!("=== Processing Summary ===");
        log::info!("Images found: {}", self.images_found);
        log::info!("Images processed: {}", self.images_processed);
        log::info!("Skipped (missing mask): {}", self.skipped_missing_mask);
        log::info!(
            "Skipped (missing annotation): {}",
            self.skipped_missing_annotation
        );
        log::info!("Failed images: {}", self.failed_images);
        log::info!("Masks resized: {}", self.masks_resized);

        let skipped = self.rows_skipped();
        if skipped > 0 {
            log::warn!(
                "Skipped annotation rows: {} (unknown cell type: {}, unknown type: {}, empty polygon: {}, degenerate box: {}, malformed: {}, write failures: {})",
                skipped,
                self.rows_unknown_cell_type,
                self.rows_unknown_annotation_type,
                self.rows_empty_polygon,
                self.rows_degenerate,
                self.rows_malformed,
                self.write_failures
            );
        }
    }
}
