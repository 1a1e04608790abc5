//! Page list and grammar extensions, read from `hdrdoc.toml`.

use crate::error::DocError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE: &str = "hdrdoc.toml";

/// Headers documented when no config file exists, as `src/<name>.h` →
/// `docs/<name>.md`.
const DEFAULT_COMPONENTS: &[&str] = &["packer", "huffman", "errors", "token", "packet"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Return types accepted by the function rule on top of the built-in ones
    #[serde(default)]
    pub return_types: Vec<String>,
    /// Pages to generate, in order
    #[serde(default)]
    pub pages: Vec<Page>,
}

/// One header and the markdown page generated from it.
///
/// When `header` is a glob pattern, `markdown` names the directory that
/// receives one page per matched header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Page {
    pub header: String,
    pub markdown: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            return_types: Vec::new(),
            pages: DEFAULT_COMPONENTS
                .iter()
                .map(|name| Page {
                    header: format!("src/{}.h", name),
                    markdown: PathBuf::from(format!("docs/{}.md", name)),
                })
                .collect(),
        }
    }
}

impl Config {
    /// Load a config file that must exist.
    pub fn from_file<P: AsRef<Path>>(config_path: P) -> Result<Self, DocError> {
        let config_path = config_path.as_ref();
        let content =
            std::fs::read_to_string(config_path).map_err(|source| DocError::ConfigRead {
                path: config_path.to_path_buf(),
                source,
            })?;

        toml::from_str(&content).map_err(|source| DocError::ConfigParse {
            path: config_path.to_path_buf(),
            source,
        })
    }

    /// Load a config file, or `None` if there is no file at `config_path`.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, DocError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }
        Self::from_file(config_path).map(Some)
    }

    /// Config for a run: the explicit file if one was given, otherwise
    /// [`CONFIG_FILE`] when present, otherwise the built-in page list.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, DocError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => Ok(Self::load_from_path(CONFIG_FILE)?.unwrap_or_else(|| {
                tracing::debug!("no {} found, using built-in page list", CONFIG_FILE);
                Config::default()
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_page_list() {
        let config = Config::default();
        let headers: Vec<&str> = config.pages.iter().map(|p| p.header.as_str()).collect();
        assert_eq!(
            headers,
            vec!["src/packer.h", "src/huffman.h", "src/errors.h", "src/token.h", "src/packet.h"]
        );
        assert_eq!(config.pages[2].markdown, PathBuf::from("docs/errors.md"));
        assert!(config.return_types.is_empty());
    }

    #[test]
    fn parses_pages_in_order() {
        let config: Config = toml::from_str(
            r#"
return_types = ["MyHandle"]

[[pages]]
header = "include/b.h"
markdown = "docs/b.md"

[[pages]]
header = "include/a.h"
markdown = "docs/a.md"
"#,
        )
        .unwrap();
        assert_eq!(config.return_types, vec!["MyHandle".to_string()]);
        assert_eq!(config.pages[0].header, "include/b.h");
        assert_eq!(config.pages[1].markdown, PathBuf::from("docs/a.md"));
    }

    #[test]
    fn empty_file_has_no_pages() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.pages.is_empty());
    }

    #[test]
    fn rejects_unknown_keys() {
        let result: Result<Config, _> = toml::from_str("headers = []\n");
        assert!(result.is_err());
    }

    #[test]
    fn load_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let loaded = Config::load_from_path(dir.path().join("hdrdoc.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn from_file_missing_is_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::from_file(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, DocError::ConfigRead { .. }));
    }

    #[test]
    fn parse_error_names_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hdrdoc.toml");
        std::fs::write(&path, "[[pages]]\nheader = 3\n").unwrap();
        let err = Config::load_from_path(&path).unwrap_err();
        assert!(matches!(err, DocError::ConfigParse { .. }));
        assert!(err.to_string().contains("hdrdoc.toml"));
    }
}
