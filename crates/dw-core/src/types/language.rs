//! Source languages recognized by docwatch.
//!
//! The extension allow-list and the language tag sent to the completion
//! service both come from the single [`LANGUAGE_TABLE`]. Supporting a new
//! language is a new variant plus one table row.

use std::fmt;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

/// A source language that can be documented.
///
/// # Examples
///
/// ```
/// use dw_core::Language;
/// use camino::Utf8Path;
///
/// assert_eq!(Language::from_path(Utf8Path::new("src/util.rs")), Some(Language::Rust));
/// assert_eq!(Language::Rust.label(), "Rust");
/// assert_eq!(Language::from_path(Utf8Path::new("README.md")), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Language {
    /// `.js` files.
    JavaScript,
    /// `.ts` files.
    TypeScript,
    /// `.py` files.
    Python,
    /// `.sol` files.
    Solidity,
    /// `.rs` files.
    Rust,
}

/// Extension (without the dot) to language, in allow-list order.
const LANGUAGE_TABLE: &[(&str, Language)] = &[
    ("js", Language::JavaScript),
    ("ts", Language::TypeScript),
    ("py", Language::Python),
    ("sol", Language::Solidity),
    ("rs", Language::Rust),
];

impl Language {
    /// Looks up the language for a file extension (without the leading dot).
    ///
    /// Matching is case-sensitive.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        LANGUAGE_TABLE
            .iter()
            .find(|(candidate, _)| *candidate == ext)
            .map(|(_, language)| *language)
    }

    /// Looks up the language for a path by its extension.
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        path.extension().and_then(Self::from_extension)
    }

    /// Returns every supported extension, in table order.
    pub fn extensions() -> impl Iterator<Item = &'static str> {
        LANGUAGE_TABLE.iter().map(|(ext, _)| *ext)
    }

    /// Returns the canonical extension for this language.
    #[must_use]
    pub fn extension(self) -> &'static str {
        LANGUAGE_TABLE
            .iter()
            .find(|(_, language)| *language == self)
            .map_or("", |(ext, _)| *ext)
    }

    /// Returns the tag used in prompts and logs.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::JavaScript => "JavaScript",
            Self::TypeScript => "TypeScript",
            Self::Python => "Python",
            Self::Solidity => "Solidity",
            Self::Rust => "Rust",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("js"), Some(Language::JavaScript));
        assert_eq!(Language::from_extension("ts"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("py"), Some(Language::Python));
        assert_eq!(Language::from_extension("sol"), Some(Language::Solidity));
        assert_eq!(Language::from_extension("rs"), Some(Language::Rust));
        assert_eq!(Language::from_extension("tsx"), None);
        assert_eq!(Language::from_extension("RS"), None);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            Language::from_path(Utf8Path::new("/repo/src/main.py")),
            Some(Language::Python)
        );
        assert_eq!(Language::from_path(Utf8Path::new("Makefile")), None);
        assert_eq!(Language::from_path(Utf8Path::new("notes.rs.bak")), None);
    }

    #[test]
    fn test_extension_round_trips_through_table() {
        for ext in Language::extensions() {
            let language = Language::from_extension(ext).unwrap();
            assert_eq!(language.extension(), ext);
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(Language::JavaScript.to_string(), "JavaScript");
        assert_eq!(Language::Solidity.label(), "Solidity");
    }
}
