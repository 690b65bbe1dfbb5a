pub mod file_walker;

pub mod table {
    // Helper to render a separator line
    fn sep(widths: &[usize]) -> String {
        let mut s = String::from("+");
        for w in widths {
            s.push_str(&"-".repeat(w + 2));
            s.push('+');
        }
        s
    }

    // Helper to render a row line
    fn line(cells: &[String], widths: &[usize]) -> String {
        let mut s = String::from("|");
        for (i, cell) in cells.iter().enumerate() {
            let w = widths[i];
            let len = cell.chars().count();
            s.push(' ');
            s.push_str(cell);
            if len < w {
                s.push_str(&" ".repeat(w - len));
            }
            s.push_str(" |");
        }
        s
    }

    /// Render a simple ASCII table given headers and rows.
    #[must_use]
    pub fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
        let cols = headers.len();
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in rows {
            for (c, w) in widths.iter_mut().enumerate().take(cols) {
                *w = (*w).max(row.get(c).map_or(0, |s| s.chars().count()));
            }
        }

        let mut out = String::new();
        out.push_str(&sep(&widths));
        out.push('\n');
        let header_cells: Vec<String> = headers.iter().map(|s| (*s).to_string()).collect();
        out.push_str(&line(&header_cells, &widths));
        out.push('\n');
        out.push_str(&sep(&widths));
        out.push('\n');
        for row in rows {
            let cells: Vec<String> = (0..cols).map(|i| row.get(i).cloned().unwrap_or_default()).collect();
            out.push_str(&line(&cells, &widths));
            out.push('\n');
        }
        out.push_str(&sep(&widths));
        out
    }
}

pub mod config {
    use serde::Deserialize;
    use std::fs;
    use std::path::{Path, PathBuf};

    use crate::errors::ConfigError;
    use crate::graph::ScanOptions;

    pub const CONFIG_FILE_NAME: &str = "polyglot-depgraph.toml";

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct ScanConfig {
        pub parallel: Option<bool>,
        pub alias_config: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct QueryConfig {
        pub default_format: Option<String>, // "text" | "json"
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct Config {
        pub scan: Option<ScanConfig>,
        pub query: Option<QueryConfig>,
    }

    impl Config {
        /// Overlay the `[scan]` table onto `base`.
        #[must_use]
        pub fn scan_options(&self, mut base: ScanOptions) -> ScanOptions {
            if let Some(scan) = &self.scan {
                if let Some(p) = scan.parallel {
                    base.parallel = p;
                }
                if let Some(a) = &scan.alias_config {
                    base.alias_config.clone_from(a);
                }
            }
            base
        }

        #[must_use]
        pub fn default_format(&self) -> Option<&str> {
            self.query.as_ref().and_then(|q| q.default_format.as_deref())
        }
    }

    fn default_config_path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE_NAME)
    }

    /// Parse a TOML config file.
    ///
    /// # Errors
    /// Returns `ConfigError` when the file cannot be read or is not valid TOML.
    pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
        let data = fs::read_to_string(path)?;
        toml::from_str::<Config>(&data)
            .map_err(|source| ConfigError::Toml { file: path.to_path_buf(), source })
    }

    #[must_use]
    pub fn load_config_at(path: &Path) -> Option<Config> {
        match read_config(path) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring configuration file");
                None
            }
        }
    }

    #[must_use]
    pub fn load_config_near(root: &Path) -> Option<Config> {
        let p = default_config_path(root);
        if p.exists() {
            load_config_at(&p)
        } else {
            None
        }
    }
}
