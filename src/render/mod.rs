//! Renderers turning a parsed header into page text.

pub mod markdown;

use crate::error::DocError;
use crate::model::Document;

/// Trait for rendering a Document into a specific output format.
pub trait Renderer {
    /// Render every visible entry of `doc`, failing on the first entry that
    /// is invalid or whose name cannot be extracted.
    fn render(&self, doc: &Document) -> Result<String, DocError>;
    fn file_extension(&self) -> &str;
}
