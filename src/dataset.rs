//! Dataset walker
//!
//! Visits every source image, loads its mask and annotation table, dispatches
//! each annotation row to the matching cropper and accumulates the counts
//! that end up in the summary report. Problems with one row or one image are
//! logged and skipped; only failures on the output root abort a run.

use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

use crate::config::Args;
use crate::counts::CountsTable;
use crate::crop::{crop_polygon, crop_rectangle};
use crate::error::{InputKind, OrganizeError};
use crate::geometry::parse_polygon;
use crate::io::{
    collect_image_files, load_image_pair, locate_inputs, read_annotation_table, ImagePair,
    OutputLayout,
};
use crate::report::write_report;
use crate::types::{AnnotationKind, AnnotationRow, ArtifactKind, CellType, ProcessingStats, Task};
use crate::utils::{create_output_directory, create_progress_bar};

/// Result of a completed organize run.
#[derive(Debug, Clone)]
pub struct OrganizeSummary {
    pub counts: CountsTable,
    pub stats: ProcessingStats,
    pub report_path: PathBuf,
}

/// Main dataset processing pipeline
pub fn process_dataset(args: &Args) -> Result<OrganizeSummary, OrganizeError> {
    for (name, dir) in args.input_dirs() {
        if !dir.is_dir() {
            return Err(OrganizeError::InvalidArgument(format!(
                "{} does not exist or is not a directory: {}",
                name,
                dir.display()
            )));
        }
    }

    if args.clean {
        create_output_directory(&args.output_dir)?;
    }
    let mut layout = OutputLayout::create(&args.output_dir)?;

    let image_files = collect_image_files(&args.image_dir, &args.image_ext)?;
    info!("Found {} images.", image_files.len());

    let mut stats = ProcessingStats::new();
    stats.images_found = image_files.len();
    let mut counts = CountsTable::new();

    let pb = create_progress_bar(image_files.len() as u64, "Processing images");
    for image_path in &image_files {
        match process_image(args, image_path, &mut layout, &mut stats) {
            Ok(image_counts) => {
                counts.merge(&image_counts);
                stats.images_processed += 1;
            }
            Err(e) => record_image_failure(&e, image_path, &mut stats),
        }
        pb.inc(1);
    }
    pb.finish_with_message("Processing complete");

    let report_path = write_report(layout.root(), &counts)?;
    stats.print_summary();
    info!("----------Finished organizing----------");
    info!("README.txt saved to {}", args.output_dir.display());

    Ok(OrganizeSummary {
        counts,
        stats,
        report_path,
    })
}

/// Process every annotation row of one image and return the crops it produced.
pub fn process_image(
    args: &Args,
    image_path: &Path,
    layout: &mut OutputLayout,
    stats: &mut ProcessingStats,
) -> Result<CountsTable, OrganizeError> {
    let inputs = locate_inputs(args, image_path)?;
    let pair = load_image_pair(&inputs)?;
    if pair.mask_resized {
        stats.masks_resized += 1;
    }
    let rows = read_annotation_table(&inputs.annotation_path)?;

    let mut counts = CountsTable::new();
    for (row_index, row) in rows.into_iter().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!(
                    "Unreadable row {} in {}: {}. Skipping...",
                    row_index,
                    inputs.annotation_path.display(),
                    e
                );
                stats.rows_malformed += 1;
                continue;
            }
        };
        match process_row(&row, row_index, &inputs.identifier, &pair, layout) {
            Ok((task, cell_type)) => counts.increment(task, cell_type),
            Err(e) => record_row_skip(&e, &inputs.identifier, row_index, stats),
        }
    }
    Ok(counts)
}

/// Crop one annotation row and write its artifacts.
///
/// The cell type is validated before the annotation type, so a row failing
/// both checks is reported as an unknown cell type.
pub fn process_row(
    row: &AnnotationRow,
    row_index: usize,
    identifier: &str,
    pair: &ImagePair,
    layout: &mut OutputLayout,
) -> Result<(Task, CellType), OrganizeError> {
    let cell_type: CellType = row.raw_classification.parse()?;
    let kind: AnnotationKind = row.kind.parse()?;

    match kind {
        AnnotationKind::Rectangle => {
            let task = Task::ObjectDetection;
            let (crop, _) = crop_rectangle(&pair.image, row.rectangle()?, pair.dimensions())?;
            let image_path =
                layout.artifact_path(task, cell_type, ArtifactKind::Image, identifier, row_index)?;
            crop.save(&image_path)?;
            debug!("Wrote {}", image_path.display());
            Ok((task, cell_type))
        }
        AnnotationKind::Polyline => {
            let task = Task::SemanticSegmentation;
            let coords_x = row
                .coords_x
                .as_deref()
                .ok_or(OrganizeError::MissingGeometry("coords_x"))?;
            let coords_y = row
                .coords_y
                .as_deref()
                .ok_or(OrganizeError::MissingGeometry("coords_y"))?;
            let vertices = parse_polygon(coords_x, coords_y)?;
            let crop = crop_polygon(&pair.image, &vertices, pair.dimensions())?;

            let image_path =
                layout.artifact_path(task, cell_type, ArtifactKind::Image, identifier, row_index)?;
            let mask_path =
                layout.artifact_path(task, cell_type, ArtifactKind::Mask, identifier, row_index)?;
            crop.image.save(&image_path)?;
            // an image without its mask would not be counted in the report
            if let Err(e) = crop.mask.save(&mask_path) {
                if let Err(remove_err) = std::fs::remove_file(&image_path) {
                    warn!(
                        "Failed to remove orphaned {}: {}",
                        image_path.display(),
                        remove_err
                    );
                }
                return Err(e.into());
            }
            debug!("Wrote {} and {}", image_path.display(), mask_path.display());
            Ok((task, cell_type))
        }
    }
}

fn record_row_skip(
    e: &OrganizeError,
    identifier: &str,
    row_index: usize,
    stats: &mut ProcessingStats,
) {
    match e {
        OrganizeError::UnknownCellType(_) => {
            warn!("{} (row {} in {}). Skipping...", e, row_index, identifier);
            stats.rows_unknown_cell_type += 1;
        }
        OrganizeError::UnknownAnnotationType(_) => {
            warn!("{} (row {} in {}). Skipping...", e, row_index, identifier);
            stats.rows_unknown_annotation_type += 1;
        }
        OrganizeError::EmptyPolygonMask => {
            warn!(
                "Empty mask for instance {} in {}. Skipping...",
                row_index, identifier
            );
            stats.rows_empty_polygon += 1;
        }
        OrganizeError::DegenerateBox { .. } | OrganizeError::MissingGeometry(_) => {
            warn!("{} (row {} in {}). Skipping...", e, row_index, identifier);
            stats.rows_degenerate += 1;
        }
        OrganizeError::Image(_) | OrganizeError::Io(_) => {
            error!(
                "Failed to write artifacts for row {} in {}: {}",
                row_index, identifier, e
            );
            stats.write_failures += 1;
        }
        _ => {
            warn!("{} (row {} in {}). Skipping...", e, row_index, identifier);
            stats.rows_malformed += 1;
        }
    }
}

fn record_image_failure(e: &OrganizeError, image_path: &Path, stats: &mut ProcessingStats) {
    match e {
        OrganizeError::MissingFile {
            kind: InputKind::Mask,
            ..
        } => {
            warn!("{}. Skipping...", e);
            stats.skipped_missing_mask += 1;
        }
        OrganizeError::MissingFile {
            kind: InputKind::Annotation,
            ..
        } => {
            warn!("{}. Skipping...", e);
            stats.skipped_missing_annotation += 1;
        }
        _ => {
            error!("Failed to process {}: {}", image_path.display(), e);
            stats.failed_images += 1;
        }
    }
}
