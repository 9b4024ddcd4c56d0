//! Error types for dataset organisation.
//!
//! Most variants describe a per-row or per-image condition that the walker
//! logs and skips; only I/O failures on the output root or the image
//! directory end a run.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn a pair of comma-joined coordinate strings into vertices.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    #[error("coordinate list for {axis} is empty")]
    Empty { axis: char },

    #[error("invalid {axis} coordinate `{token}`")]
    InvalidToken { axis: char, token: String },

    #[error("coordinate lists differ in length: {xs} x values, {ys} y values")]
    LengthMismatch { xs: usize, ys: usize },
}

/// Which input file of an identifier is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Image,
    Mask,
    Annotation,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::Image => write!(f, "image"),
            InputKind::Mask => write!(f, "mask"),
            InputKind::Annotation => write!(f, "annotation"),
        }
    }
}

#[derive(Error, Debug)]
pub enum OrganizeError {
    #[error("missing {kind}: {}", path.display())]
    MissingFile { kind: InputKind, path: PathBuf },

    #[error("unknown cell type `{0}`")]
    UnknownCellType(String),

    #[error("unknown annotation type `{0}`")]
    UnknownAnnotationType(String),

    #[error("rasterized polygon mask is empty")]
    EmptyPolygonMask,

    #[error("degenerate crop box x {x_min}..{x_max}, y {y_min}..{y_max}")]
    DegenerateBox {
        x_min: i64,
        y_min: i64,
        x_max: i64,
        y_max: i64,
    },

    #[error("missing geometry field `{0}`")]
    MissingGeometry(&'static str),

    #[error("malformed coordinates: {0}")]
    Coordinates(#[from] CoordinateError),

    #[error("image: {0}")]
    Image(#[from] image::ImageError),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
