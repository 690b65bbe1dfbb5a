use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::language::Language;
use crate::utils::file_walker::SourceFile;

/// Lexical category of an import construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyKind {
    Import,
    Require,
    DynamicImport,
    Include,
    Using,
    From,
    Export,
}

impl DependencyKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Require => "require",
            Self::DynamicImport => "dynamic-import",
            Self::Include => "include",
            Self::Using => "using",
            Self::From => "from",
            Self::Export => "export",
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One occurrence of a dependency in a file, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyReference {
    pub target: String,
    pub kind: DependencyKind,
    pub line: Option<usize>,
}

#[derive(Debug)]
pub struct RegexPatterns {
    pub js_import: Regex,
    pub js_require: Regex,
    pub js_dynamic_import: Regex,
    pub js_export_from: Regex,
    pub py_import: Regex,
    pub py_from: Regex,
    pub java_import: Regex,
    pub cs_using: Regex,
    pub c_include: Regex,
    pub go_import: Regex,
    pub go_import_block: Regex,
    pub quoted: Regex,
    pub rust_use: Regex,
}

impl RegexPatterns {
    pub fn compile() -> Self {
        // Line-oriented patterns only; no attempt to skip comments or strings
        let js_import =
            Regex::new(r#"\bimport\s+[^'";]*?\s*\bfrom\s*['"]([^'"\n]+)['"]"#).unwrap();
        let js_require = Regex::new(r#"\brequire\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#).unwrap();
        let js_dynamic_import = Regex::new(r#"\bimport\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#).unwrap();
        let js_export_from =
            Regex::new(r#"\bexport\s+[^'";]*?\s*\bfrom\s*['"]([^'"\n]+)['"]"#).unwrap();
        let py_import = Regex::new(r"(?m)^[ \t]*import[ \t]+([\w.]+)[ \t]*\r?$").unwrap();
        let py_from = Regex::new(r"(?m)^[ \t]*from[ \t]+(\.*[\w.]*)[ \t]+import\b").unwrap();
        let java_import =
            Regex::new(r"(?m)^[ \t]*import[ \t]+(?:static[ \t]+)?([\w.]+)[ \t]*;").unwrap();
        let cs_using =
            Regex::new(r"(?m)^[ \t]*using[ \t]+(?:static[ \t]+)?([\w.]+)[ \t]*;").unwrap();
        let c_include = Regex::new(r#"(?m)^[ \t]*#[ \t]*include[ \t]*[<"]([^>"\n]+)[>"]"#).unwrap();
        let go_import = Regex::new(r#"(?m)^[ \t]*import[ \t]+(?:[\w.]+[ \t]+)?"([^"\n]+)""#).unwrap();
        let go_import_block = Regex::new(r"(?m)^[ \t]*import[ \t]*\(([^)]*)\)").unwrap();
        let quoted = Regex::new(r#""([^"\n]+)""#).unwrap();
        let rust_use =
            Regex::new(r"(?m)^[ \t]*(?:pub(?:\([^)]*\))?[ \t]+)?use[ \t]+((?:::)?[\w]+(?:::[\w]+)*)")
                .unwrap();
        Self {
            js_import,
            js_require,
            js_dynamic_import,
            js_export_from,
            py_import,
            py_from,
            java_import,
            cs_using,
            c_include,
            go_import,
            go_import_block,
            quoted,
            rust_use,
        }
    }
}

impl Default for RegexPatterns {
    fn default() -> Self {
        Self::compile()
    }
}

/// Applies the pattern set registered for a file's language.
#[derive(Debug, Default)]
pub struct DependencyExtractor {
    patterns: RegexPatterns,
}

impl DependencyExtractor {
    pub fn new() -> Self {
        Self { patterns: RegexPatterns::compile() }
    }

    /// Extract raw references from a collected file, in source order.
    #[must_use]
    pub fn extract_file(&self, file: &SourceFile) -> Vec<DependencyReference> {
        self.extract(&file.content, file.language)
    }

    #[must_use]
    pub fn extract(&self, content: &str, language: Language) -> Vec<DependencyReference> {
        let p = &self.patterns;
        let mut found: Vec<(usize, String, DependencyKind)> = Vec::new();
        match language {
            Language::TypeScript | Language::JavaScript => {
                collect(&mut found, &p.js_import, content, DependencyKind::Import);
                collect(&mut found, &p.js_require, content, DependencyKind::Require);
                collect(&mut found, &p.js_dynamic_import, content, DependencyKind::DynamicImport);
                collect(&mut found, &p.js_export_from, content, DependencyKind::Export);
            }
            Language::Python => {
                collect(&mut found, &p.py_import, content, DependencyKind::Import);
                collect(&mut found, &p.py_from, content, DependencyKind::From);
            }
            Language::Java => collect(&mut found, &p.java_import, content, DependencyKind::Import),
            Language::CSharp => collect(&mut found, &p.cs_using, content, DependencyKind::Using),
            Language::C | Language::Cpp => {
                collect(&mut found, &p.c_include, content, DependencyKind::Include);
            }
            Language::Go => {
                collect(&mut found, &p.go_import, content, DependencyKind::Import);
                for block in p.go_import_block.captures_iter(content) {
                    let Some(body) = block.get(1) else { continue };
                    for entry in p.quoted.captures_iter(body.as_str()) {
                        if let Some(m) = entry.get(1) {
                            found.push((
                                body.start() + m.start(),
                                m.as_str().to_string(),
                                DependencyKind::Import,
                            ));
                        }
                    }
                }
            }
            Language::Rust => collect(&mut found, &p.rust_use, content, DependencyKind::Import),
            Language::Ruby
            | Language::Php
            | Language::Swift
            | Language::Kotlin
            | Language::Scala
            | Language::Dart
            | Language::Vue
            | Language::Svelte
            | Language::Unknown => {}
        }

        found.sort_by_key(|(offset, _, _)| *offset);
        found
            .into_iter()
            .map(|(offset, target, kind)| DependencyReference {
                target,
                kind,
                line: Some(line_number_for(content, offset)),
            })
            .collect()
    }
}

fn collect(
    out: &mut Vec<(usize, String, DependencyKind)>,
    re: &Regex,
    content: &str,
    kind: DependencyKind,
) {
    for cap in re.captures_iter(content) {
        if let Some(m) = cap.get(1) {
            let target = m.as_str();
            if !target.is_empty() {
                out.push((m.start(), target.to_string(), kind));
            }
        }
    }
}

fn line_number_for(content: &str, byte_idx: usize) -> usize {
    // 1-based line number
    content[..byte_idx].bytes().filter(|&b| b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(refs: &[DependencyReference]) -> Vec<(&str, DependencyKind)> {
        refs.iter().map(|r| (r.target.as_str(), r.kind)).collect()
    }

    #[test]
    fn typescript_four_forms() {
        let src = r#"import { a, b } from './ab';
import * as ns from "../ns";
const fs = require('fs');
const lazy = import("./lazy");
export { thing } from './thing';
export * from "./all";
"#;
        let refs = DependencyExtractor::new().extract(src, Language::TypeScript);
        assert_eq!(
            targets(&refs),
            vec![
                ("./ab", DependencyKind::Import),
                ("../ns", DependencyKind::Import),
                ("fs", DependencyKind::Require),
                ("./lazy", DependencyKind::DynamicImport),
                ("./thing", DependencyKind::Export),
                ("./all", DependencyKind::Export),
            ]
        );
        assert_eq!(refs[0].line, Some(1));
        assert_eq!(refs[3].line, Some(4));
    }

    #[test]
    fn multiline_import_braces() {
        let src = "import {\n  x,\n  y,\n} from './xy';\n";
        let refs = DependencyExtractor::new().extract(src, Language::JavaScript);
        assert_eq!(targets(&refs), vec![("./xy", DependencyKind::Import)]);
        assert_eq!(refs[0].line, Some(4));
    }

    #[test]
    fn commented_imports_are_still_extracted() {
        let src = "// import { old } from './legacy';\n";
        let refs = DependencyExtractor::new().extract(src, Language::TypeScript);
        assert_eq!(targets(&refs), vec![("./legacy", DependencyKind::Import)]);
    }

    #[test]
    fn python_import_and_from() {
        let src = "import os.path\nfrom pkg.mod import f\nfrom . import sibling\nimport a, b\n    from .inner import g\n";
        let refs = DependencyExtractor::new().extract(src, Language::Python);
        assert_eq!(
            targets(&refs),
            vec![
                ("os.path", DependencyKind::Import),
                ("pkg.mod", DependencyKind::From),
                (".", DependencyKind::From),
                (".inner", DependencyKind::From),
            ]
        );
    }

    #[test]
    fn java_and_csharp() {
        let ex = DependencyExtractor::new();
        let java = "package a;\nimport com.acme.util.Strings;\nimport static com.acme.Math.max;\nimport java.util.*;\n";
        assert_eq!(
            targets(&ex.extract(java, Language::Java)),
            vec![
                ("com.acme.util.Strings", DependencyKind::Import),
                ("com.acme.Math.max", DependencyKind::Import),
            ]
        );
        let cs = "using System;\nusing Acme.Models;\nnamespace X { }\n";
        assert_eq!(
            targets(&ex.extract(cs, Language::CSharp)),
            vec![("System", DependencyKind::Using), ("Acme.Models", DependencyKind::Using)]
        );
    }

    #[test]
    fn c_includes_both_delimiters() {
        let src = "#include <stdio.h>\n#include \"util/str.h\"\n  #  include \"x\"\n";
        let refs = DependencyExtractor::new().extract(src, Language::C);
        assert_eq!(
            targets(&refs),
            vec![
                ("stdio.h", DependencyKind::Include),
                ("util/str.h", DependencyKind::Include),
                ("x", DependencyKind::Include),
            ]
        );
        assert_eq!(refs[2].line, Some(3));
    }

    #[test]
    fn go_single_and_block_imports() {
        let src = "package main\n\nimport \"fmt\"\nimport (\n\t\"os\"\n\tlog \"./logging\"\n)\n";
        let refs = DependencyExtractor::new().extract(src, Language::Go);
        assert_eq!(
            targets(&refs),
            vec![
                ("fmt", DependencyKind::Import),
                ("os", DependencyKind::Import),
                ("./logging", DependencyKind::Import),
            ]
        );
        assert_eq!(refs[1].line, Some(5));
        assert_eq!(refs[2].line, Some(6));
    }

    #[test]
    fn rust_use_keeps_path_segments() {
        let src = "use crate::graph::resolver;\npub use super::util::{a, b};\npub(crate) use self::x::Y as Z;\n";
        let refs = DependencyExtractor::new().extract(src, Language::Rust);
        assert_eq!(
            targets(&refs),
            vec![
                ("crate::graph::resolver", DependencyKind::Import),
                ("super::util", DependencyKind::Import),
                ("self::x::Y", DependencyKind::Import),
            ]
        );
    }

    #[test]
    fn languages_without_patterns_yield_nothing() {
        let ex = DependencyExtractor::new();
        assert!(ex.extract("require 'json'\nimport Foundation\n", Language::Ruby).is_empty());
        assert!(ex.extract("import './a'", Language::Unknown).is_empty());
    }
}
