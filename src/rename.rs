//! Rename raw slide images to the identifiers of a metadata table.
//!
//! Raw exports are named `<slide><separator><anything>`; the organize step
//! expects `<slide>.png`. Each slide listed in the metadata column is matched
//! against the raw file names and moved into the target directory.

use log::{info, warn};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::RenameArgs;
use crate::error::OrganizeError;
use crate::types::PNG_EXTENSION;

/// Outcome counters of a rename run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenameStats {
    pub moved: usize,
    pub not_found: usize,
    pub duplicates: usize,
}

/// Read the slide identifiers from `column` of the metadata table, in order.
pub fn read_slide_names(metadata_csv: &Path, column: &str) -> Result<Vec<String>, OrganizeError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(metadata_csv)?;
    let column_index = reader
        .headers()?
        .iter()
        .position(|header| header == column)
        .ok_or_else(|| {
            OrganizeError::InvalidArgument(format!(
                "column `{}` not found in {}",
                column,
                metadata_csv.display()
            ))
        })?;

    let mut slides = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(slide) = record.get(column_index).filter(|s| !s.is_empty()) {
            slides.push(slide.to_string());
        }
    }
    Ok(slides)
}

/// The slide prefix of a raw file name: everything before the first separator.
pub fn slide_prefix<'a>(file_name: &'a str, separator: &str) -> &'a str {
    file_name.split(separator).next().unwrap_or(file_name)
}

/// Move every raw file matching a metadata slide to `<target_dir>/<slide>.png`.
pub fn rename_slides(args: &RenameArgs) -> Result<RenameStats, OrganizeError> {
    let slides = read_slide_names(&args.metadata_csv, &args.column)?;
    let raw_files = list_files(&args.source_dir)?;
    fs::create_dir_all(&args.target_dir)?;

    let mut stats = RenameStats::default();
    let mut moved: HashSet<PathBuf> = HashSet::new();

    for slide in &slides {
        let mut candidates = raw_files.iter().filter(|(name, path)| {
            slide_prefix(name, &args.id_separator) == slide && !moved.contains(path)
        });

        let Some((file_name, source_path)) = candidates.next() else {
            warn!("Image {} not found in {}.", slide, args.source_dir.display());
            stats.not_found += 1;
            continue;
        };
        let extra: Vec<&String> = candidates.map(|(name, _)| name).collect();

        let destination = args
            .target_dir
            .join(format!("{}.{}", slide, PNG_EXTENSION));
        move_file(source_path, &destination)?;
        info!(
            "Renamed and moved {} to {}",
            file_name,
            destination.display()
        );
        stats.moved += 1;
        moved.insert(source_path.clone());

        if !extra.is_empty() {
            warn!(
                "Slide {} has {} more matching file(s) left in place: {:?}",
                slide,
                extra.len(),
                extra
            );
            stats.duplicates += extra.len();
        }
    }

    info!(
        "Image renaming and moving completed: {} moved, {} not found.",
        stats.moved, stats.not_found
    );
    Ok(stats)
}

fn list_files(dir: &Path) -> Result<Vec<(String, PathBuf)>, OrganizeError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => files.push((name, entry.path())),
            Err(name) => warn!("Skipping non UTF-8 file name {:?}", name),
        }
    }
    files.sort();
    Ok(files)
}

// rename fails across filesystems, so fall back to copy + delete
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to)?;
    fs::remove_file(from)
}
