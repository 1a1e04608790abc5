//! Line classifier. Maps one header line to the kind of declaration it
//! starts.
//!
//! The grammar is the ordered [`RULES`] table: the first rule that matches
//! wins. Lines that carry no documentation meaning are recognised separately
//! by [`is_noise`] and never reach the table.

use crate::error::DocError;
use crate::model::{DocKind, RE_DEFINE_VALUE};
use regex::Regex;
use std::sync::LazyLock;

/// Return types a documented function may have out of the box.
pub const DEFAULT_RETURN_TYPES: &[&str] = &[
    "void",
    "bool",
    "char",
    "int",
    "size_t",
    "int8_t",
    "uint8_t",
    "int16_t",
    "uint16_t",
    "int32_t",
    "uint32_t",
    "int64_t",
    "uint64_t",
    "Error",
    "DDNetError",
    "Token",
    "Unpacker",
    "Packer",
    "PacketHeader",
    "PacketKind",
    "PacketControl",
    "PacketNormal",
    "ControlMessage",
    "DDNetPacket",
    "DDNetPacketHeader",
    "DDNetToken",
    "DDNetChunkHeader",
];

// -- Noise patterns -----------------------------------------------------------

static RE_BLANK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*$").unwrap());

static RE_PRAGMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*#\s*pragma\b").unwrap());

/// `#ifdef __cplusplus`, the wrapper around the language-linkage block.
static RE_LINKAGE_WRAPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\s*ifdef\s+__cplusplus\s*$").unwrap());

static RE_ENDIF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*#\s*endif\b").unwrap());

static RE_LINKAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*extern\s+"C"\s*\{\s*$"#).unwrap());

static RE_INCLUDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\s*include\b").unwrap());

static RE_LONE_BRACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\}\s*$").unwrap());

static RE_GUARD_IFNDEF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\s*ifndef\s+(\w+)\s*$").unwrap());

static RE_GUARD_DEFINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\s*define\s+(\w+)\s*$").unwrap());

// -- Declaration patterns -----------------------------------------------------

static RE_MACRO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#define \w+").unwrap());

/// Returns true if the line is structural noise outside any declaration.
///
/// Noise lines are skipped without touching the pending comment, so a
/// comment may be separated from its declaration by any of them. Include
/// guards need the neighbouring lines: `#ifndef NAME` directly followed by
/// `#define NAME` is noise, either line on its own is not.
pub fn is_noise(line: &str, prev: Option<&str>, next: Option<&str>) -> bool {
    RE_BLANK.is_match(line)
        || RE_PRAGMA.is_match(line)
        || RE_LINKAGE_WRAPPER.is_match(line)
        || RE_ENDIF.is_match(line)
        || RE_LINKAGE.is_match(line)
        || RE_INCLUDE.is_match(line)
        || RE_LONE_BRACE.is_match(line)
        || is_include_guard(line, prev, next)
}

/// `#ifndef NAME` with `#define NAME` on the next line, or that `#define`.
fn is_include_guard(line: &str, prev: Option<&str>, next: Option<&str>) -> bool {
    let guarded = |ifndef: Option<&str>, define: Option<&str>| {
        match (
            ifndef.and_then(|l| capture(&RE_GUARD_IFNDEF, l)),
            define.and_then(|l| capture(&RE_GUARD_DEFINE, l)),
        ) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    };
    guarded(Some(line), next) || guarded(prev, Some(line))
}

fn capture<'a>(re: &Regex, line: &'a str) -> Option<&'a str> {
    re.captures(line).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// One entry of the classification grammar.
pub struct Rule {
    pub kind: DocKind,
    matches: fn(&LineClassifier, &str, Option<&str>) -> bool,
}

/// Classification grammar, in precedence order.
pub const RULES: &[Rule] = &[
    Rule {
        kind: DocKind::Function,
        matches: |c, line, _| c.is_function(line),
    },
    Rule {
        kind: DocKind::Typedef,
        matches: |_, line, _| is_typedef(line),
    },
    Rule {
        kind: DocKind::GlobalConstant,
        matches: |_, line, _| is_global_constant(line),
    },
    Rule {
        kind: DocKind::XMacro,
        matches: |_, line, next| is_x_macro(line, next),
    },
    Rule {
        kind: DocKind::DefineValue,
        matches: |_, line, _| is_define_value(line),
    },
    Rule {
        kind: DocKind::Struct,
        matches: |_, line, _| is_struct(line),
    },
    Rule {
        kind: DocKind::Enum,
        matches: |_, line, _| is_enum(line),
    },
    Rule {
        kind: DocKind::Union,
        matches: |_, line, _| is_union(line),
    },
];

/// Classifier holding the function rule compiled for a return-type whitelist.
#[derive(Debug)]
pub struct LineClassifier {
    re_function: Regex,
}

impl LineClassifier {
    /// Build a classifier accepting the default return types plus `extra`.
    pub fn new(extra: &[String]) -> Result<Self, DocError> {
        let types: Vec<String> = DEFAULT_RETURN_TYPES
            .iter()
            .copied()
            .chain(extra.iter().map(|t| t.trim()))
            .filter(|t| {
                if t.is_empty() {
                    tracing::warn!("ignoring empty return type");
                }
                !t.is_empty()
            })
            .map(regex::escape)
            .collect();
        let pattern = format!(r"^(?:const )?(?:{}) \*?\w+\(", types.join("|"));
        let re_function = Regex::new(&pattern).map_err(|source| DocError::Grammar { source })?;
        Ok(LineClassifier { re_function })
    }

    /// Kind of declaration `line` starts, or `None` if no rule matches.
    ///
    /// `next` is the line after `line`; only the X-macro rule looks at it.
    pub fn classify(&self, line: &str, next: Option<&str>) -> Option<DocKind> {
        RULES
            .iter()
            .find(|rule| (rule.matches)(self, line, next))
            .map(|rule| rule.kind)
    }

    pub fn is_function(&self, line: &str) -> bool {
        self.re_function.is_match(line)
    }
}

pub fn is_typedef(line: &str) -> bool {
    if is_struct(line) || is_enum(line) || is_union(line) {
        return false;
    }
    line.starts_with("typedef ")
}

pub fn is_global_constant(line: &str) -> bool {
    line.starts_with("extern const ")
}

/// A macro definition whose next line starts an `X(...)` list.
pub fn is_x_macro(line: &str, next: Option<&str>) -> bool {
    RE_MACRO.is_match(line) && next.is_some_and(|n| n.trim().starts_with("X("))
}

pub fn is_define_value(line: &str) -> bool {
    RE_DEFINE_VALUE.is_match(line)
}

pub fn is_struct(line: &str) -> bool {
    line.trim() == "typedef struct {"
}

pub fn is_enum(line: &str) -> bool {
    line.trim() == "typedef enum {"
}

pub fn is_union(line: &str) -> bool {
    line.trim() == "typedef union {"
}
