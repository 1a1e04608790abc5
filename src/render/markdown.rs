//! Markdown renderer.
//!
//! Each entry becomes a `#` heading with its name, a `## Syntax` section
//! holding the raw declaration in a C code fence, and the comment text as
//! written in the header. Entries are separated by one blank line.

use crate::error::DocError;
use crate::model::{DocEntry, Document};
use crate::render::Renderer;

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, doc: &Document) -> Result<String, DocError> {
        let mut output = String::new();

        for entry in &doc.entries {
            output.push_str(&render_entry(doc, entry)?);
            output.push('\n');
        }

        Ok(output)
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

/// Render a single entry after checking it is complete.
fn render_entry(doc: &Document, entry: &DocEntry) -> Result<String, DocError> {
    let missing = entry.missing_fields();
    if !missing.is_empty() {
        return Err(DocError::InvalidEntry {
            path: doc.header.clone(),
            line: entry.line,
            kind: entry.kind,
            missing,
        });
    }

    let name = entry.name().ok_or_else(|| DocError::NameExtraction {
        path: doc.header.clone(),
        line: entry.line,
        kind: entry.kind,
        signature: entry.signature.clone(),
    })?;

    let mut markdown = String::new();
    markdown.push_str(&format!("# {}\n\n", name));
    markdown.push_str("## Syntax\n\n");
    markdown.push_str("```C\n");
    markdown.push_str(&entry.signature);
    markdown.push_str("\n```\n\n");
    // TODO: link identifiers in the comment that name other documented
    // types and functions to their headings.
    markdown.push_str(&entry.comment);
    Ok(markdown)
}
