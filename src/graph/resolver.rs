use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use crate::errors::ConfigError;
use crate::language::Language;
use crate::parser::DependencyReference;
use crate::utils::file_walker::{relative_id, SourceFile};

// Ancestor directories searched for Java/C# package paths
const MAX_PACKAGE_WALK: usize = 10;

const INCLUDE_EXTENSIONS: &[&str] = &[".h", ".hpp", ".c", ".cpp"];

#[derive(Debug, Deserialize, Default)]
struct TsConfig {
    #[serde(rename = "compilerOptions", default)]
    compiler_options: Option<CompilerOptions>,
}

#[derive(Debug, Deserialize, Default)]
struct CompilerOptions {
    #[serde(rename = "baseUrl", default)]
    base_url: Option<String>,
    #[serde(default)]
    paths: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Ordered prefix-to-directory rewrites from a `tsconfig.json` style file.
///
/// Entries keep declaration order; the first matching prefix wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: Vec<(String, String)>,
}

impl AliasTable {
    #[must_use]
    pub fn from_entries(entries: Vec<(String, String)>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse `{ compilerOptions: { baseUrl?, paths: { "<prefix>/*": ["<dir>/*", ...] } } }`.
    ///
    /// Only the first mapped entry of each alias is used. Directories are made
    /// relative to the project root through `baseUrl` when present.
    ///
    /// # Errors
    /// Returns the JSON error when the document is not valid JSON of that shape.
    pub fn parse(data: &str) -> Result<Self, serde_json::Error> {
        let cfg: TsConfig = serde_json::from_str(data)?;
        let Some(opts) = cfg.compiler_options else {
            return Ok(Self::default());
        };
        let base = opts.base_url.as_deref().map(|b| b.trim_start_matches("./").trim_end_matches('/'));
        let mut entries = Vec::new();
        for (alias, targets) in opts.paths.unwrap_or_default() {
            let Some(first) = targets.as_array().and_then(|a| a.first()).and_then(|v| v.as_str())
            else {
                continue;
            };
            let prefix = alias.strip_suffix("/*").unwrap_or(&alias).to_string();
            let dir = first.strip_suffix("/*").unwrap_or(first).trim_start_matches("./");
            if prefix.is_empty() {
                continue;
            }
            let dir = match base {
                Some(b) if !b.is_empty() && b != "." => format!("{b}/{dir}"),
                _ => dir.to_string(),
            };
            entries.push((prefix, dir));
        }
        Ok(Self { entries })
    }

    /// Load the alias table from `root/<file_name>`; a missing file is an empty table.
    ///
    /// # Errors
    /// Returns `ConfigError` when the file exists but cannot be read or parsed.
    pub fn load(root: &Path, file_name: &str) -> Result<Self, ConfigError> {
        let path = root.join(file_name);
        if !path.is_file() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        Self::parse(&data).map_err(|source| ConfigError::Json { file: path, source })
    }

    /// Rewrite `target` through the first matching alias, as a root-relative path.
    fn rewrite(&self, target: &str) -> Option<String> {
        for (prefix, dir) in &self.entries {
            let Some(rest) = target.strip_prefix(prefix.as_str()) else {
                continue;
            };
            if !rest.is_empty() && !rest.starts_with('/') && !prefix.ends_with('/') {
                continue;
            }
            let rest = rest.trim_start_matches('/');
            return Some(if rest.is_empty() { dir.clone() } else { format!("{dir}/{rest}") });
        }
        None
    }
}

/// Maps raw dependency strings onto collected files.
pub struct Resolver {
    root: PathBuf,
    aliases: AliasTable,
    node_ids: HashSet<String>,
    // base file name -> first node id carrying it
    by_file_name: HashMap<String, String>,
}

impl Resolver {
    /// `root` must be the same (normalised) root the node ids were made relative to.
    pub fn new<I, S>(root: &Path, aliases: AliasTable, node_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ids = HashSet::new();
        let mut by_file_name = HashMap::new();
        for id in node_ids {
            let id = id.as_ref().to_string();
            let name = id.rsplit('/').next().unwrap_or(&id).to_string();
            by_file_name.entry(name).or_insert_with(|| id.clone());
            ids.insert(id);
        }
        Self { root: normalize(root), aliases, node_ids: ids, by_file_name }
    }

    /// Resolve one reference made by `file` to a node id.
    #[must_use]
    pub fn resolve(&self, file: &SourceFile, reference: &DependencyReference) -> Option<String> {
        let path = self.resolve_path(file, &reference.target)?;
        self.node_for(&path)
    }

    /// Resolve a raw target to an existing file on disk.
    #[must_use]
    pub fn resolve_path(&self, file: &SourceFile, target: &str) -> Option<PathBuf> {
        let dir = file.dir();
        match file.language {
            Language::TypeScript | Language::JavaScript => {
                if let Some(rewritten) = self.aliases.rewrite(target) {
                    return probe(&self.root.join(rewritten), file.language);
                }
                if target.starts_with('.') || target.starts_with('/') {
                    return probe(&dir.join(target), file.language);
                }
                None
            }
            Language::Go => probe(&dir.join(target), Language::Go)
                .or_else(|| probe(&self.root.join(target), Language::Go)),
            Language::C | Language::Cpp => probe_include(&dir.join(target)),
            Language::Python => self.resolve_python(dir, target),
            Language::Java => self.resolve_package(dir, target, ".java"),
            Language::CSharp => self.resolve_package(dir, target, ".cs"),
            Language::Rust => self.resolve_rust(&file.path, target),
            Language::Ruby
            | Language::Php
            | Language::Swift
            | Language::Kotlin
            | Language::Scala
            | Language::Dart
            | Language::Vue
            | Language::Svelte
            | Language::Unknown => None,
        }
    }

    /// Match a resolved path back to a node: exact relative path first, then base name.
    ///
    /// The base-name lookup also covers paths that land outside the root.
    #[must_use]
    pub fn node_for(&self, path: &Path) -> Option<String> {
        let path = normalize(path);
        if let Some(rel) = relative_id(&self.root, &path) {
            if self.node_ids.contains(&rel) {
                return Some(rel);
            }
        }
        let name = path.file_name()?.to_str()?;
        self.by_file_name.get(name).cloned()
    }

    fn resolve_python(&self, dir: &Path, target: &str) -> Option<PathBuf> {
        let dots = target.chars().take_while(|&c| c == '.').count();
        let segments: Vec<&str> = target[dots..].split('.').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return None;
        }
        if dots > 0 {
            let mut start = dir.to_path_buf();
            for _ in 1..dots {
                start = start.parent()?.to_path_buf();
            }
            return walk_python(&start, &segments);
        }
        walk_python(&self.root, &segments).or_else(|| walk_python(dir, &segments))
    }

    fn resolve_package(&self, dir: &Path, target: &str, ext: &str) -> Option<PathBuf> {
        let segments: Vec<&str> = target.split('.').filter(|s| !s.is_empty()).collect();
        let (class, package) = segments.split_last()?;
        let mut rel = PathBuf::new();
        for seg in package {
            rel.push(seg);
        }
        rel.push(format!("{class}{ext}"));

        let mut cur = Some(dir);
        for _ in 0..MAX_PACKAGE_WALK {
            let Some(d) = cur else { break };
            let candidate = d.join(&rel);
            if candidate.is_file() {
                return Some(candidate);
            }
            if normalize(d) == self.root {
                break;
            }
            cur = d.parent();
        }
        None
    }

    fn resolve_rust(&self, file: &Path, target: &str) -> Option<PathBuf> {
        let dir = file.parent()?;
        let mut segments = target.split("::").filter(|s| !s.is_empty()).peekable();
        let mut cur = match segments.peek().copied() {
            Some("crate") => {
                segments.next();
                self.crate_root(dir)?
            }
            Some("self") => {
                segments.next();
                module_dir(file)?
            }
            Some("super") => {
                let mut d = module_dir(file)?;
                while segments.peek() == Some(&"super") {
                    segments.next();
                    d = d.parent()?.to_path_buf();
                }
                d
            }
            _ => dir.to_path_buf(),
        };

        for seg in segments {
            let candidate = cur.join(seg);
            let lib = candidate.join("lib.rs");
            if lib.is_file() {
                return Some(lib);
            }
            if candidate.join("mod.rs").is_file() {
                cur = candidate;
                continue;
            }
            let module = cur.join(format!("{seg}.rs"));
            if module.is_file() {
                return Some(module);
            }
            return None;
        }
        None
    }

    // Nearest ancestor (within the project) holding lib.rs or main.rs
    fn crate_root(&self, dir: &Path) -> Option<PathBuf> {
        let mut cur = Some(dir);
        while let Some(d) = cur {
            if d.join("lib.rs").is_file() || d.join("main.rs").is_file() {
                return Some(d.to_path_buf());
            }
            if normalize(d) == self.root {
                return None;
            }
            cur = d.parent();
        }
        None
    }
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut s: OsString = base.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

// For each extension: base+ext, then base/index+ext; finally the bare path.
fn probe(base: &Path, language: Language) -> Option<PathBuf> {
    for ext in language.extensions() {
        let file = with_suffix(base, ext);
        if file.is_file() {
            return Some(file);
        }
        let index = base.join(format!("index{ext}"));
        if index.is_file() {
            return Some(index);
        }
    }
    base.is_file().then(|| base.to_path_buf())
}

fn probe_include(base: &Path) -> Option<PathBuf> {
    INCLUDE_EXTENSIONS
        .iter()
        .map(|ext| with_suffix(base, ext))
        .find(|p| p.is_file())
        .or_else(|| base.is_file().then(|| base.to_path_buf()))
}

fn walk_python(start: &Path, segments: &[&str]) -> Option<PathBuf> {
    let mut cur = start.to_path_buf();
    for (i, seg) in segments.iter().enumerate() {
        let module = cur.join(format!("{seg}.py"));
        if module.is_file() {
            return Some(module);
        }
        let package = cur.join(seg);
        let marker = package.join("__init__.py");
        if !marker.is_file() {
            return None;
        }
        if i + 1 == segments.len() {
            return Some(marker);
        }
        cur = package;
    }
    None
}

// Directory holding the children of the module defined by `file`
fn module_dir(file: &Path) -> Option<PathBuf> {
    let dir = file.parent()?;
    let stem = file.file_stem()?.to_str()?;
    if matches!(stem, "mod" | "lib" | "main") {
        Some(dir.to_path_buf())
    } else {
        Some(dir.join(stem))
    }
}

/// Lexically resolve `.` and `..` components.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(out.components().next_back(), Some(Component::Normal(_)));
                if can_pop {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
