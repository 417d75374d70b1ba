//! Error types for font loading.

use rustybuzz::ttf_parser::FaceParsingError;
use thiserror::Error;

/// Errors that can occur while turning font bytes into a usable face.
///
/// Shaping and rendering never fail once a face exists; these errors are only
/// produced at construction time.
#[derive(Error, Debug)]
pub enum FontError {
    /// The face data is not a font `ttf-parser` understands.
    #[error("failed to parse font face: {0}")]
    Parse(FaceParsingError),

    /// The rasterizer rejected the face.
    #[error("rasterizer rejected font face: {0}")]
    Rasterizer(&'static str),

    /// Reading a font file failed.
    #[error("failed to read font: {0}")]
    Io(#[from] std::io::Error),

    /// The storage has no face with this ID.
    #[error("no face with id {0:?}")]
    UnknownFace(fontdb::ID),

    /// A color table is truncated or internally inconsistent.
    #[error("malformed {table} table: {reason}")]
    MalformedTable {
        table: &'static str,
        reason: &'static str,
    },
}

/// Result type for font operations.
pub type FontResult<T> = Result<T, FontError>;
