//! Data model for parsed header documentation, independent of output format.

use regex::Regex;
use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

static RE_FUNC_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" \*?(\w+)\(").unwrap());

static RE_TRAILING_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" (\w+);$").unwrap());

static RE_BLOCK_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\} (\w+)").unwrap());

/// Matches `#define NAME VALUE` where VALUE is a numeric expression such as
/// `128`, `-1`, `0x1f` or `(1 << 10)`. Shared with the line classifier.
pub(crate) static RE_DEFINE_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^#define ([A-Z][A-Z0-9_]*) +",
        r"\(*\s*[-+]?(?:0x[0-9A-Fa-f]+|[0-9]+)",
        r"(?:\s*[-+*/<>()]+\s*\(*\s*[-+]?(?:0x[0-9A-Fa-f]+|[0-9]+)\s*\)*)*",
        r"\s*\)*\s*$"
    ))
    .unwrap()
});

/// Complete parsed document from a single header file.
#[derive(Debug, Default)]
pub struct Document {
    pub header: PathBuf,
    /// Entries in declaration order
    pub entries: Vec<DocEntry>,
}

/// Kind of declaration a documentation entry was created from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocKind {
    Function,
    Typedef,
    GlobalConstant,
    DefineValue,
    Struct,
    Enum,
    Union,
    XMacro,
}

/// Per-kind behaviour: diagnostics label, visibility and name extraction.
struct KindStrategy {
    label: &'static str,
    rendered: bool,
    block: bool,
    name: fn(&str) -> Option<&str>,
}

const FUNCTION: KindStrategy = KindStrategy {
    label: "function",
    rendered: true,
    block: false,
    name: function_name,
};
const TYPEDEF: KindStrategy = KindStrategy {
    label: "typedef",
    rendered: true,
    block: false,
    name: trailing_name,
};
const GLOBAL_CONSTANT: KindStrategy = KindStrategy {
    label: "global constant",
    rendered: true,
    block: false,
    name: trailing_name,
};
const DEFINE_VALUE: KindStrategy = KindStrategy {
    label: "define",
    rendered: true,
    block: false,
    name: define_name,
};
const STRUCT: KindStrategy = KindStrategy {
    label: "struct",
    rendered: true,
    block: true,
    name: block_name,
};
const ENUM: KindStrategy = KindStrategy {
    label: "enum",
    rendered: true,
    block: true,
    name: block_name,
};
const UNION: KindStrategy = KindStrategy {
    label: "union",
    rendered: true,
    block: true,
    name: block_name,
};
// Parsed only so the scanner can step over enum helper macros.
const X_MACRO: KindStrategy = KindStrategy {
    label: "x-macro",
    rendered: false,
    block: true,
    name: no_name,
};

impl DocKind {
    fn strategy(self) -> &'static KindStrategy {
        match self {
            DocKind::Function => &FUNCTION,
            DocKind::Typedef => &TYPEDEF,
            DocKind::GlobalConstant => &GLOBAL_CONSTANT,
            DocKind::DefineValue => &DEFINE_VALUE,
            DocKind::Struct => &STRUCT,
            DocKind::Enum => &ENUM,
            DocKind::Union => &UNION,
            DocKind::XMacro => &X_MACRO,
        }
    }

    /// Whether entries of this kind end up in the generated page.
    pub fn is_rendered(self) -> bool {
        self.strategy().rendered
    }

    /// Whether the declaration spans several lines and needs block collection.
    pub fn is_block(self) -> bool {
        self.strategy().block
    }
}

impl fmt::Display for DocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.strategy().label)
    }
}

/// A single documented declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocEntry {
    pub kind: DocKind,
    /// Comment text, one `\n`-terminated line per comment line
    pub comment: String,
    /// Raw declaration text; block lines are joined with `\n`
    pub signature: String,
    /// 1-based header line the declaration starts on
    pub line: usize,
}

impl DocEntry {
    pub fn new(kind: DocKind, comment: String, signature: String, line: usize) -> Self {
        DocEntry {
            kind,
            comment,
            signature,
            line,
        }
    }

    /// Declared identifier, or `None` if the signature does not have the
    /// shape this kind expects.
    pub fn name(&self) -> Option<&str> {
        (self.kind.strategy().name)(&self.signature)
    }

    /// Names of the required fields that are still empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.comment.is_empty() {
            missing.push("comment");
        }
        if self.signature.is_empty() {
            missing.push("signature");
        }
        missing
    }
}

fn capture<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
    re.captures(text).and_then(|c| c.get(1)).map(|m| m.as_str())
}

fn function_name(signature: &str) -> Option<&str> {
    capture(&RE_FUNC_NAME, signature)
}

fn trailing_name(signature: &str) -> Option<&str> {
    capture(&RE_TRAILING_NAME, signature.trim_end())
}

fn define_name(signature: &str) -> Option<&str> {
    capture(&RE_DEFINE_VALUE, signature)
}

fn no_name(_signature: &str) -> Option<&str> {
    None
}

fn block_name(signature: &str) -> Option<&str> {
    signature
        .lines()
        .last()
        .and_then(|last| capture(&RE_BLOCK_NAME, last))
}
