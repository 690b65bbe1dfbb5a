//! Closed set of language tags recognised by the scanner.
//!
//! Every per-language decision (file admission, extraction patterns, resolution
//! strategy) dispatches on [`Language`] with an exhaustive `match`, so adding a
//! language means adding a variant and letting the compiler point at the gaps.
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    TypeScript,
    JavaScript,
    Python,
    Java,
    CSharp,
    Cpp,
    C,
    Go,
    Rust,
    Ruby,
    Php,
    Swift,
    Kotlin,
    Scala,
    Dart,
    Vue,
    Svelte,
    Unknown,
}

impl Language {
    /// Map a file extension (without the leading dot) to its language tag.
    ///
    /// Extensions outside the table return `None`; such files are never collected.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        let lang = match ext {
            "ts" | "tsx" => Self::TypeScript,
            "js" | "jsx" => Self::JavaScript,
            "py" => Self::Python,
            "java" => Self::Java,
            "cs" => Self::CSharp,
            "cpp" | "hpp" => Self::Cpp,
            "c" | "h" => Self::C,
            "go" => Self::Go,
            "rs" => Self::Rust,
            "rb" => Self::Ruby,
            "php" => Self::Php,
            "swift" => Self::Swift,
            "kt" => Self::Kotlin,
            "scala" => Self::Scala,
            "dart" => Self::Dart,
            "vue" => Self::Vue,
            "svelte" => Self::Svelte,
            _ => return None,
        };
        Some(lang)
    }

    /// Parse a serialized tag; anything unrecognised is `Unknown`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        Self::ALL.iter().copied().find(|l| l.as_str() == tag).unwrap_or(Self::Unknown)
    }

    pub const ALL: [Language; 18] = [
        Self::TypeScript,
        Self::JavaScript,
        Self::Python,
        Self::Java,
        Self::CSharp,
        Self::Cpp,
        Self::C,
        Self::Go,
        Self::Rust,
        Self::Ruby,
        Self::Php,
        Self::Swift,
        Self::Kotlin,
        Self::Scala,
        Self::Dart,
        Self::Vue,
        Self::Svelte,
        Self::Unknown,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::JavaScript => "javascript",
            Self::Python => "python",
            Self::Java => "java",
            Self::CSharp => "csharp",
            Self::Cpp => "cpp",
            Self::C => "c",
            Self::Go => "go",
            Self::Rust => "rust",
            Self::Ruby => "ruby",
            Self::Php => "php",
            Self::Swift => "swift",
            Self::Kotlin => "kotlin",
            Self::Scala => "scala",
            Self::Dart => "dart",
            Self::Vue => "vue",
            Self::Svelte => "svelte",
            Self::Unknown => "unknown",
        }
    }

    /// Presentation bucket used by renderers to colour nodes.
    #[must_use]
    pub fn group(self) -> u32 {
        match self {
            Self::Unknown => 0,
            Self::TypeScript => 1,
            Self::JavaScript => 2,
            Self::Python => 3,
            Self::Java => 4,
            Self::CSharp => 5,
            Self::Cpp => 6,
            Self::C => 7,
            Self::Go => 8,
            Self::Rust => 9,
            Self::Ruby => 10,
            Self::Php => 11,
            Self::Swift => 12,
            Self::Kotlin => 13,
            Self::Scala => 14,
            Self::Dart => 15,
            Self::Vue => 16,
            Self::Svelte => 17,
        }
    }

    /// Extensions (with dot) probed when resolving a path written without one.
    #[must_use]
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::TypeScript | Self::JavaScript => &[".ts", ".tsx", ".js", ".jsx"],
            Self::Python => &[".py"],
            Self::Java => &[".java"],
            Self::CSharp => &[".cs"],
            Self::C | Self::Cpp => &[".h", ".hpp", ".c", ".cpp"],
            Self::Go => &[".go"],
            Self::Rust => &[".rs"],
            Self::Ruby => &[".rb"],
            Self::Php => &[".php"],
            Self::Swift => &[".swift"],
            Self::Kotlin => &[".kt"],
            Self::Scala => &[".scala"],
            Self::Dart => &[".dart"],
            Self::Vue => &[".vue"],
            Self::Svelte => &[".svelte"],
            Self::Unknown => &[],
        }
    }

    /// Whether an extraction pattern set exists for this language.
    #[must_use]
    pub fn has_extractor(self) -> bool {
        matches!(
            self,
            Self::TypeScript
                | Self::JavaScript
                | Self::Python
                | Self::Java
                | Self::CSharp
                | Self::C
                | Self::Cpp
                | Self::Go
                | Self::Rust
        )
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_table_maps_known_and_skips_unknown() {
        assert_eq!(Language::from_extension("tsx"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("h"), Some(Language::C));
        assert_eq!(Language::from_extension("hpp"), Some(Language::Cpp));
        assert_eq!(Language::from_extension("svelte"), Some(Language::Svelte));
        assert_eq!(Language::from_extension("md"), None);
        assert_eq!(Language::from_extension("TS"), None);
    }

    #[test]
    fn tags_round_trip_and_fall_through_to_unknown() {
        for lang in Language::ALL {
            assert_eq!(Language::from_tag(lang.as_str()), lang);
        }
        assert_eq!(Language::from_tag("cobol"), Language::Unknown);
    }

    #[test]
    fn groups_are_distinct() {
        let mut groups: Vec<u32> = Language::ALL.iter().map(|l| l.group()).collect();
        groups.sort_unstable();
        groups.dedup();
        assert_eq!(groups.len(), Language::ALL.len());
    }

    #[test]
    fn only_the_nine_pattern_languages_have_extractors() {
        let with: Vec<Language> = Language::ALL.iter().copied().filter(|l| l.has_extractor()).collect();
        assert_eq!(with.len(), 9);
        assert!(Language::Rust.has_extractor());
        assert!(!Language::Vue.has_extractor());
        assert!(!Language::Unknown.has_extractor());
    }

    #[test]
    fn serializes_lowercase() {
        let s = serde_json::to_string(&Language::CSharp).unwrap();
        assert_eq!(s, "\"csharp\"");
    }
}
