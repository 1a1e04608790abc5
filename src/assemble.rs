//! Document assembler. Turns each configured header into its markdown page
//! and either writes the page or checks the existing one is current.

use crate::config::{Config, Page};
use crate::error::DocError;
use crate::parser::{self, classify::LineClassifier};
use crate::render::{markdown::MarkdownRenderer, Renderer};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Replace every page with freshly rendered text
    Write,
    /// Fail if any page differs from freshly rendered text; never writes
    Verify,
}

/// A header resolved to a concrete page path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub header: PathBuf,
    pub markdown: PathBuf,
}

/// Process every configured page in order. Returns the number of pages.
///
/// The first error stops the run; pages after it are not touched.
pub fn run(config: &Config, mode: Mode) -> Result<usize, DocError> {
    let classifier = LineClassifier::new(&config.return_types)?;
    let renderer = MarkdownRenderer;
    let targets = expand_pages(&config.pages, renderer.file_extension())?;

    for target in &targets {
        let text = render_header(&target.header, &classifier, &renderer)?;
        match mode {
            Mode::Write => write_page(&target.markdown, &text)?,
            Mode::Verify => verify_page(&target.markdown, &text)?,
        }
    }

    Ok(targets.len())
}

/// Scan one header and render the entries that belong in its page.
pub fn render_header(
    header: &Path,
    classifier: &LineClassifier,
    renderer: &dyn Renderer,
) -> Result<String, DocError> {
    let content = fs::read_to_string(header).map_err(|e| DocError::io(header, e))?;
    let mut doc = parser::parse_file(header, &content, classifier)?;
    // X-macro blocks are only parsed so the scanner can step over them.
    doc.entries.retain(|e| e.kind.is_rendered());
    renderer.render(&doc)
}

/// Resolve the page list, expanding glob headers into one target per file.
pub fn expand_pages(pages: &[Page], extension: &str) -> Result<Vec<Target>, DocError> {
    let mut targets = Vec::new();
    for page in pages {
        if !is_glob(&page.header) {
            targets.push(Target {
                header: PathBuf::from(&page.header),
                markdown: page.markdown.clone(),
            });
            continue;
        }

        let mut matches: Vec<PathBuf> = glob::glob(&page.header)
            .map_err(|source| DocError::Pattern {
                pattern: page.header.clone(),
                source,
            })?
            .map(|entry| {
                entry.map_err(|e| {
                    let path = e.path().to_path_buf();
                    DocError::io(path, e.into_error())
                })
            })
            .filter(|entry| entry.as_ref().map_or(true, |p| p.is_file()))
            .collect::<Result<_, _>>()?;
        if matches.is_empty() {
            tracing::warn!(pattern = %page.header, "no headers matched");
        }
        // Sort for deterministic output
        matches.sort();

        for header in matches {
            let markdown = page
                .markdown
                .join(format!("{}.{}", derive_output_name(&header), extension));
            targets.push(Target { header, markdown });
        }
    }
    Ok(targets)
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Derive the output file name (without extension) from a header path.
/// "include/ddnet_protocol/packer.h" → "packer"
fn derive_output_name(header: &Path) -> String {
    header
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| header.to_string_lossy().to_string())
}

/// Replace `path` with `text` so that readers only ever see the old or the
/// new page, never a partial one. A page that already holds `text` is left
/// alone.
fn write_page(path: &Path, text: &str) -> Result<(), DocError> {
    if fs::read(path).is_ok_and(|current| current == text.as_bytes()) {
        tracing::debug!(page = %path.display(), "unchanged");
        return Ok(());
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| DocError::io(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| DocError::io(dir, e))?;
    tmp.write_all(text.as_bytes())
        .map_err(|e| DocError::io(path, e))?;
    tmp.persist(path).map_err(|e| DocError::io(path, e.error))?;

    tracing::info!(page = %path.display(), "wrote");
    Ok(())
}

/// Compare the page on disk against `text` byte for byte.
fn verify_page(path: &Path, text: &str) -> Result<(), DocError> {
    let current = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(DocError::MissingTarget {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(DocError::io(path, e)),
    };

    if current != text.as_bytes() {
        return Err(DocError::StaleDocumentation {
            path: path.to_path_buf(),
        });
    }

    tracing::info!(page = %path.display(), "up to date");
    Ok(())
}
