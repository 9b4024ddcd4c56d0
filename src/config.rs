use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for organizing a NuCLS-style dataset into
/// per-cell-type detection and segmentation crops.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Directory containing the source images, named `<identifier>.<image_ext>`
    #[arg(short = 'i', long = "image_dir")]
    pub image_dir: PathBuf,

    /// Directory containing one label mask per identifier, named `<identifier>.png`
    #[arg(short = 'm', long = "mask_dir")]
    pub mask_dir: PathBuf,

    /// Directory containing one annotation table per identifier, named `<identifier>.csv`
    #[arg(short = 'a', long = "annotation_dir")]
    pub annotation_dir: PathBuf,

    /// Root directory for the organized dataset and README.txt
    #[arg(short = 'o', long = "output_dir")]
    pub output_dir: PathBuf,

    /// Extension of the source images
    #[arg(long = "image_ext", default_value = "png", value_parser = validate_extension)]
    pub image_ext: String,

    /// Delete and recreate the output directory before processing
    #[arg(long = "clean")]
    pub clean: bool,
}

impl Args {
    pub fn new(
        image_dir: impl Into<PathBuf>,
        mask_dir: impl Into<PathBuf>,
        annotation_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            image_dir: image_dir.into(),
            mask_dir: mask_dir.into(),
            annotation_dir: annotation_dir.into(),
            output_dir: output_dir.into(),
            image_ext: crate::types::PNG_EXTENSION.to_string(),
            clean: false,
        }
    }

    /// Input directories that must exist before a run starts
    pub fn input_dirs(&self) -> [(&'static str, &PathBuf); 3] {
        [
            ("image_dir", &self.image_dir),
            ("mask_dir", &self.mask_dir),
            ("annotation_dir", &self.annotation_dir),
        ]
    }
}

/// Command-line arguments for renaming raw slide images to their metadata identifiers.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct RenameArgs {
    /// Metadata table listing the slide identifiers
    #[arg(short = 'c', long = "metadata_csv")]
    pub metadata_csv: PathBuf,

    /// Flat directory of raw files named `<slide><separator>...`
    #[arg(short = 's', long = "source_dir")]
    pub source_dir: PathBuf,

    /// Directory receiving `<slide>.png`
    #[arg(short = 't', long = "target_dir")]
    pub target_dir: PathBuf,

    /// Metadata column holding the slide identifier
    #[arg(long = "column", default_value = "slide_name")]
    pub column: String,

    /// Separator between the slide identifier and the rest of a raw file name
    #[arg(long = "id_separator", default_value = "_id", value_parser = validate_separator)]
    pub id_separator: String,
}

impl RenameArgs {
    pub fn new(
        metadata_csv: impl Into<PathBuf>,
        source_dir: impl Into<PathBuf>,
        target_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            metadata_csv: metadata_csv.into(),
            source_dir: source_dir.into(),
            target_dir: target_dir.into(),
            column: "slide_name".to_string(),
            id_separator: "_id".to_string(),
        }
    }
}

// Validate a bare file extension such as `png` or `tif`. Matching is
// case-insensitive, so the value is kept as given.
pub fn validate_extension(s: &str) -> Result<String, String> {
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(s.to_string())
    } else {
        Err("EXT must be a non-empty alphanumeric extension without a dot".to_string())
    }
}

fn validate_separator(s: &str) -> Result<String, String> {
    if s.is_empty() {
        Err("SEPARATOR must not be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}
