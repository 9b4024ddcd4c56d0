use glob::{glob_with, MatchOptions};
use image::imageops::FilterType;
use image::DynamicImage;
use log::info;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Args;
use crate::error::{InputKind, OrganizeError};
use crate::types::{
    AnnotationRow, ArtifactKind, CellType, Task, ANNOTATION_EXTENSION, PNG_EXTENSION,
};
use crate::utils::{file_stem_str, sanitize_identifier};

/// The three input files sharing one identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFiles {
    pub identifier: String,
    pub image_path: PathBuf,
    pub mask_path: PathBuf,
    pub annotation_path: PathBuf,
}

/// An image and its mask, guaranteed to have the same dimensions.
#[derive(Debug, Clone)]
pub struct ImagePair {
    pub image: DynamicImage,
    pub mask: DynamicImage,
    pub mask_resized: bool,
}

impl ImagePair {
    /// (width, height) shared by image and mask
    pub fn dimensions(&self) -> (u32, u32) {
        (self.mask.width(), self.mask.height())
    }
}

/// List the images of `image_dir` carrying extension `ext` (any case), sorted by path.
pub fn collect_image_files(image_dir: &Path, ext: &str) -> Result<Vec<PathBuf>, OrganizeError> {
    let dir = image_dir.to_str().ok_or_else(|| {
        OrganizeError::InvalidArgument(format!("non UTF-8 path: {}", image_dir.display()))
    })?;
    let pattern = format!("{}/*.{}", glob::Pattern::escape(dir), ext);
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };
    let paths = glob_with(&pattern, options)
        .map_err(|e| OrganizeError::InvalidArgument(e.to_string()))?;

    let mut images: Vec<PathBuf> = paths
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                log::warn!("Failed to read directory entry: {}", e);
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    images.sort();
    Ok(images)
}

/// Resolve the mask and annotation files belonging to `image_path`.
pub fn locate_inputs(args: &Args, image_path: &Path) -> Result<InputFiles, OrganizeError> {
    let missing = |kind, path: &Path| OrganizeError::MissingFile {
        kind,
        path: path.to_path_buf(),
    };
    if !image_path.is_file() {
        return Err(missing(InputKind::Image, image_path));
    }
    let identifier = file_stem_str(image_path)
        .ok_or_else(|| missing(InputKind::Image, image_path))?
        .to_string();

    let mask_path = args
        .mask_dir
        .join(format!("{}.{}", identifier, PNG_EXTENSION));
    if !mask_path.is_file() {
        return Err(missing(InputKind::Mask, &mask_path));
    }

    let annotation_path = args
        .annotation_dir
        .join(format!("{}.{}", identifier, ANNOTATION_EXTENSION));
    if !annotation_path.is_file() {
        return Err(missing(InputKind::Annotation, &annotation_path));
    }

    Ok(InputFiles {
        identifier,
        image_path: image_path.to_path_buf(),
        mask_path,
        annotation_path,
    })
}

/// Decode image and mask, resizing the mask with nearest-neighbour sampling
/// when its dimensions differ from the image.
pub fn load_image_pair(inputs: &InputFiles) -> Result<ImagePair, OrganizeError> {
    let image = image::open(&inputs.image_path)?;
    let mut mask = image::open(&inputs.mask_path)?;

    let mut mask_resized = false;
    if (mask.width(), mask.height()) != (image.width(), image.height()) {
        info!(
            "Resizing mask for {} from {}x{} to {}x{}",
            inputs.identifier,
            mask.width(),
            mask.height(),
            image.width(),
            image.height()
        );
        mask = mask.resize_exact(image.width(), image.height(), FilterType::Nearest);
        mask_resized = true;
    }

    Ok(ImagePair {
        image,
        mask,
        mask_resized,
    })
}

/// Read an annotation table. The outer error covers the file itself (missing,
/// unreadable header); each row carries its own deserialization result.
pub fn read_annotation_table(
    path: &Path,
) -> Result<Vec<Result<AnnotationRow, csv::Error>>, OrganizeError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    reader.headers()?;
    Ok(reader.deserialize::<AnnotationRow>().collect())
}

/// Resolves artifact paths under the output root and creates each bucket
/// directory the first time it is needed.
#[derive(Debug)]
pub struct OutputLayout {
    root: PathBuf,
    created: HashSet<PathBuf>,
}

impl OutputLayout {
    /// Prepare the output root and its per-task directories.
    pub fn create(root: &Path) -> std::io::Result<Self> {
        let mut layout = Self {
            root: root.to_path_buf(),
            created: HashSet::new(),
        };
        for task in Task::ALL {
            let task_dir = layout.root.join(task.dir_name());
            layout.ensure_dir(task_dir)?;
        }
        Ok(layout)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding `kind` artifacts for (`task`, `cell_type`)
    pub fn bucket_dir(&self, task: Task, cell_type: CellType, kind: ArtifactKind) -> PathBuf {
        self.root
            .join(task.dir_name())
            .join(cell_type.as_str())
            .join(kind.dir_name())
    }

    /// `<bucket>/<prefix>_<identifier>_<row>.png`, with the bucket created if needed.
    pub fn artifact_path(
        &mut self,
        task: Task,
        cell_type: CellType,
        kind: ArtifactKind,
        identifier: &str,
        row: usize,
    ) -> std::io::Result<PathBuf> {
        let dir = self.bucket_dir(task, cell_type, kind);
        let file_name = format!(
            "{}_{}_{}.{}",
            kind.file_prefix(),
            sanitize_identifier(identifier),
            row,
            PNG_EXTENSION
        );
        let path = dir.join(file_name);
        self.ensure_dir(dir)?;
        Ok(path)
    }

    fn ensure_dir(&mut self, dir: PathBuf) -> std::io::Result<()> {
        if !self.created.contains(&dir) {
            fs::create_dir_all(&dir)?;
            self.created.insert(dir);
        }
        Ok(())
    }
}
