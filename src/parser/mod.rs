//! Parser module: dispatch by file extension.

pub mod classify;
pub mod scan;

use crate::error::DocError;
use crate::model::Document;
use classify::LineClassifier;
use std::path::Path;

/// File extensions recognized as C headers.
pub const HEADER_EXTENSIONS: &[&str] = &["h", "hh", "hpp"];

/// Parse a header file into a Document based on its extension.
pub fn parse_file(
    path: &Path,
    content: &str,
    classifier: &LineClassifier,
) -> Result<Document, DocError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if HEADER_EXTENSIONS.contains(&ext) => scan::scan(path, content, classifier),
        _ => Err(DocError::UnsupportedFile {
            path: path.to_path_buf(),
        }),
    }
}
