//! Header scanner: one forward pass over a header, one line of lookahead.
//!
//! Outside a block every line is, in order: structural noise (skipped),
//! a `// ` comment line (accumulated), or the start of a declaration
//! (classified). Once a struct/enum/union or X-macro block is open it owns
//! the scanner until its closing line has been appended.

use crate::error::DocError;
use crate::model::{DocEntry, DocKind, Document};
use crate::parser::classify::{is_noise, LineClassifier};
use std::path::Path;

/// Closing token of a struct/enum/union block.
const BLOCK_END: &str = "} ";

/// Scan a header into its documentation entries, in declaration order.
pub fn scan(path: &Path, input: &str, classifier: &LineClassifier) -> Result<Document, DocError> {
    let mut scanner = Scanner::new(path, classifier);

    let lines: Vec<&str> = input.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        let prev = i.checked_sub(1).map(|p| lines[p]);
        let next = lines.get(i + 1).copied();
        scanner.process_line(i + 1, line, prev, next)?;
    }

    scanner.finish()
}

struct Scanner<'a> {
    path: &'a Path,
    classifier: &'a LineClassifier,
    // Pending comment for the next declaration
    comment: String,
    // Block currently being collected
    open: Option<DocEntry>,
    entries: Vec<DocEntry>,
}

impl<'a> Scanner<'a> {
    fn new(path: &'a Path, classifier: &'a LineClassifier) -> Self {
        Scanner {
            path,
            classifier,
            comment: String::new(),
            open: None,
            entries: Vec::new(),
        }
    }

    fn process_line(
        &mut self,
        number: usize,
        line: &str,
        prev: Option<&str>,
        next: Option<&str>,
    ) -> Result<(), DocError> {
        if let Some(block) = self.open.as_mut() {
            block.signature.push('\n');
            block.signature.push_str(line);
            if closes_block(block.kind, line) {
                if let Some(block) = self.open.take() {
                    tracing::trace!(kind = %block.kind, line = block.line, "closed block");
                    self.entries.push(block);
                }
            }
            return Ok(());
        }

        if is_noise(line, prev, next) {
            return Ok(());
        }

        if let Some(text) = comment_text(line) {
            self.comment.push_str(text);
            self.comment.push('\n');
            return Ok(());
        }

        let kind = self
            .classifier
            .classify(line, next)
            .ok_or_else(|| DocError::UnclassifiedLine {
                path: self.path.to_path_buf(),
                line: number,
                text: line.to_string(),
            })?;

        let comment = std::mem::take(&mut self.comment);
        if kind.is_block() {
            self.open = Some(DocEntry::new(kind, comment, line.to_string(), number));
        } else {
            tracing::trace!(%kind, line = number, "declaration");
            self.entries
                .push(DocEntry::new(kind, comment, line.trim().to_string(), number));
        }
        Ok(())
    }

    fn finish(self) -> Result<Document, DocError> {
        if let Some(block) = self.open {
            return Err(DocError::UnterminatedBlock {
                path: self.path.to_path_buf(),
                line: block.line,
                kind: block.kind,
            });
        }
        if !self.comment.is_empty() {
            tracing::warn!(
                header = %self.path.display(),
                "comment at end of file does not document anything"
            );
        }
        tracing::debug!(
            header = %self.path.display(),
            entries = self.entries.len(),
            "scanned header"
        );
        Ok(Document {
            header: self.path.to_path_buf(),
            entries: self.entries,
        })
    }
}

/// Text of a documentation comment line, `""` for a bare `//`.
fn comment_text(line: &str) -> Option<&str> {
    if let Some(text) = line.strip_prefix("// ") {
        return Some(text);
    }
    if line.trim() == "//" {
        return Some("");
    }
    None
}

fn closes_block(kind: DocKind, line: &str) -> bool {
    match kind {
        DocKind::XMacro => !line.trim_end().ends_with('\\'),
        _ => line.starts_with(BLOCK_END),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_str(input: &str) -> Result<Document, DocError> {
        let classifier = LineClassifier::new(&[]).unwrap();
        scan(Path::new("test.h"), input, &classifier)
    }

    fn kinds(doc: &Document) -> Vec<DocKind> {
        doc.entries.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn single_function() {
        let doc = scan_str("// Does a thing.\nbool ddnet_do_thing(int x);\n").unwrap();
        assert_eq!(doc.entries.len(), 1);
        let e = &doc.entries[0];
        assert_eq!(e.kind, DocKind::Function);
        assert_eq!(e.comment, "Does a thing.\n");
        assert_eq!(e.signature, "bool ddnet_do_thing(int x);");
        assert_eq!(e.line, 2);
    }

    #[test]
    fn bare_marker_is_paragraph_break() {
        let doc = scan_str("// First.\n//\n// Second.\nvoid f(void);\n").unwrap();
        assert_eq!(doc.entries[0].comment, "First.\n\nSecond.\n");
    }

    #[test]
    fn noise_keeps_pending_comment() {
        let input = "// Docs.\n\n#include \"common.h\"\n#ifdef __cplusplus\nextern \"C\" {\n#endif\nvoid f(void);\n";
        let doc = scan_str(input).unwrap();
        assert_eq!(doc.entries[0].comment, "Docs.\n");
    }

    #[test]
    fn include_guard_keeps_pending_comment() {
        let input = "// Docs.\n#ifndef DDNET_THING_H\n#define DDNET_THING_H\nvoid f(void);\n#endif\n";
        let doc = scan_str(input).unwrap();
        assert_eq!(doc.entries.len(), 1);
        assert_eq!(doc.entries[0].comment, "Docs.\n");
    }

    #[test]
    fn valueless_define_does_not_pass_its_comment_on() {
        let err = scan_str("// Enables foo.\n#define DDNET_ENABLE_FOO\n// Size.\n#define SIZE 3\n")
            .unwrap_err();
        match err {
            DocError::UnclassifiedLine { line, text, .. } => {
                assert_eq!(line, 2);
                assert_eq!(text, "#define DDNET_ENABLE_FOO");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unrelated_conditional_is_fatal() {
        let err = scan_str("// Docs.\n#ifdef DEBUG\nvoid f(void);\n#endif\n").unwrap_err();
        assert!(matches!(err, DocError::UnclassifiedLine { line: 2, .. }));
    }

    #[test]
    fn comment_is_consumed_by_declaration() {
        let doc = scan_str("// Docs.\nvoid f(void);\nvoid g(void);\n").unwrap();
        assert_eq!(doc.entries[0].comment, "Docs.\n");
        assert_eq!(doc.entries[1].comment, "");
    }

    #[test]
    fn preserves_declaration_order() {
        let input = "\
// A
#define MAX_SIZE 128
// B
typedef uint8_t Byte;
// C
extern const Token TOKEN_MAGIC;
// D
typedef union {
\tint a;
} U;
// E
size_t g(void);
";
        let doc = scan_str(input).unwrap();
        assert_eq!(
            kinds(&doc),
            vec![
                DocKind::DefineValue,
                DocKind::Typedef,
                DocKind::GlobalConstant,
                DocKind::Union,
                DocKind::Function,
            ]
        );
        let names: Vec<_> = doc.entries.iter().map(|e| e.name().unwrap()).collect();
        assert_eq!(names, vec!["MAX_SIZE", "Byte", "TOKEN_MAGIC", "U", "g"]);
    }

    #[test]
    fn struct_block_keeps_blank_lines() {
        let input = "// A pair.\ntypedef struct {\n\tint32_t a;\n\n\tint32_t b;\n} Pair;\n";
        let doc = scan_str(input).unwrap();
        assert_eq!(doc.entries.len(), 1);
        let e = &doc.entries[0];
        assert_eq!(e.kind, DocKind::Struct);
        assert_eq!(
            e.signature,
            "typedef struct {\n\tint32_t a;\n\n\tint32_t b;\n} Pair;"
        );
        assert_eq!(e.name(), Some("Pair"));
    }

    #[test]
    fn block_owns_scanner_until_closed() {
        // Comments and preprocessor lines inside the body are signature text.
        let input = "\
// Errors.
typedef enum {
// not a doc comment
#define X(err) err,
\tDDNET_ERRORS
#undef X
} DDNetError;
";
        let doc = scan_str(input).unwrap();
        assert_eq!(doc.entries.len(), 1);
        assert_eq!(doc.entries[0].comment, "Errors.\n");
        assert!(doc.entries[0].signature.contains("// not a doc comment"));
        assert!(doc.entries[0].signature.contains("#undef X"));
    }

    #[test]
    fn x_macro_block_collects_continuations() {
        let input = "\
#define DDNET_ERRORS \\
\tX(DDNET_ERR_NONE) \\
\tX(DDNET_ERR_INVALID_PACKET)

// Generic error enum.
typedef enum {
\tDDNET_ERR_NONE,
} DDNetError;
";
        let doc = scan_str(input).unwrap();
        assert_eq!(kinds(&doc), vec![DocKind::XMacro, DocKind::Enum]);
        assert_eq!(
            doc.entries[0].signature,
            "#define DDNET_ERRORS \\\n\tX(DDNET_ERR_NONE) \\\n\tX(DDNET_ERR_INVALID_PACKET)"
        );
        assert_eq!(doc.entries[1].comment, "Generic error enum.\n");
    }

    #[test]
    fn x_macro_takes_pending_comment() {
        let input = "// List of errors.\n#define ERRS \\\n\tX(A)\n// Enum.\ntypedef enum {\n} E;\n";
        let doc = scan_str(input).unwrap();
        assert_eq!(doc.entries[0].comment, "List of errors.\n");
        assert_eq!(doc.entries[1].comment, "Enum.\n");
    }

    #[test]
    fn unclassified_line_names_location() {
        let err = scan_str("// Hi.\n#define GREETING \"hi\"\n").unwrap_err();
        match err {
            DocError::UnclassifiedLine { path, line, text } => {
                assert_eq!(path, Path::new("test.h"));
                assert_eq!(line, 2);
                assert_eq!(text, "#define GREETING \"hi\"");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unterminated_block_names_opening_line() {
        let err = scan_str("\n// S.\ntypedef struct {\n\tint a;\n").unwrap_err();
        match err {
            DocError::UnterminatedBlock { line, kind, .. } => {
                assert_eq!(line, 3);
                assert_eq!(kind, DocKind::Struct);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn declaration_without_comment_is_kept() {
        let doc = scan_str("void f(void);\n").unwrap();
        assert_eq!(doc.entries.len(), 1);
        assert_eq!(doc.entries[0].missing_fields(), vec!["comment"]);
    }

    #[test]
    fn trailing_comment_is_dropped() {
        let doc = scan_str("// F.\nvoid f(void);\n// dangling\n").unwrap();
        assert_eq!(doc.entries.len(), 1);
    }

    #[test]
    fn empty_input() {
        let doc = scan_str("").unwrap();
        assert!(doc.entries.is_empty());
        assert_eq!(doc.header, Path::new("test.h"));
    }
}
