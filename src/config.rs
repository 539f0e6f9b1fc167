//! Run profiles: built-in presets and config files
//!
//! A [`Profile`] bundles everything a run needs besides the root path. It
//! starts from a [`Preset`], may be replaced piecewise by a TOML or JSON
//! config file, and is finally adjusted by CLI flags.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::output::{ConcatFormat, DecodePolicy};
use crate::walk::{ExtensionRule, FilterConfig, KeywordMatch, KeywordRule, SubtreeRule};

/// Images and fonts never worth dumping as text.
const MEDIA_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "ico", "woff", "woff2", "ttf", "eot",
];

const VCS_AND_DEPS: &[&str] = &[".git", "node_modules"];

/// What a run produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// File contents under path headers.
    #[default]
    Concat,
    /// Directory tree listing.
    Tree,
}

/// Built-in profiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Everything except media, VCS/dependency dirs, two data files and `components/ui`.
    #[default]
    Minimal,
    /// Page-section directories only; scripts plus the two stylesheet entry points.
    Sections,
    /// Catalog-related directories; everything but media and JSON.
    Catalog,
    /// Directory tree listing.
    Tree,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Minimal, Preset::Sections, Preset::Catalog, Preset::Tree];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Minimal => "minimal",
            Preset::Sections => "sections",
            Preset::Catalog => "catalog",
            Preset::Tree => "tree",
        }
    }

    pub fn profile(self) -> Profile {
        match self {
            Preset::Minimal => Profile {
                mode: Mode::Concat,
                output: PathBuf::from("codigo_exportado.txt"),
                filter: FilterConfig {
                    exclude_dirs: strings(VCS_AND_DEPS.iter().chain(&["__pycache__"])),
                    exclude_names: [".DS_Store".to_string()].into(),
                    exclude_paths: [
                        "data/categories.json".to_string(),
                        "data/products_normalized.json".to_string(),
                    ]
                    .into(),
                    extensions: ExtensionRule::deny(MEDIA_EXTENSIONS),
                    skip_subtrees: vec![SubtreeRule::new("ui", "components")],
                    ..Default::default()
                },
                format: ConcatFormat::hash(),
            },
            Preset::Sections => Profile {
                mode: Mode::Concat,
                output: PathBuf::from("frontend_clean.txt"),
                filter: FilterConfig {
                    exclude_dirs: strings(VCS_AND_DEPS.iter().chain(&["dist", "ui", "assets"])),
                    exclude_path_keywords: vec![".json".to_string()],
                    extensions: ExtensionRule::allow(["tsx", "ts", "jsx", "js", "css"]),
                    keep_only: BTreeMap::from([(
                        "css".to_string(),
                        BTreeSet::from(["App.css".to_string(), "index.css".to_string()]),
                    )]),
                    keywords: Some(KeywordRule::new(
                        [
                            "header", "footer", "landing", "projects", "clients", "partners",
                            "catalog", "marketing", "contact", "layout", "styles", "app",
                        ],
                        KeywordMatch::Path,
                    )),
                    ..Default::default()
                },
                format: ConcatFormat::arrow(1),
            },
            Preset::Catalog => Profile {
                mode: Mode::Concat,
                output: PathBuf::from("frontend_catalog.txt"),
                filter: FilterConfig {
                    exclude_dirs: strings(VCS_AND_DEPS.iter().chain(&["dist", "assets"])),
                    exclude_names: [".DS_Store".to_string()].into(),
                    extensions: ExtensionRule::deny(
                        MEDIA_EXTENSIONS.iter().chain(&["webp", "svg", "json"]),
                    ),
                    keywords: Some(KeywordRule::new(
                        [
                            "catalog", "products", "projects", "services", "partners", "clients",
                            "shared", "core",
                        ],
                        KeywordMatch::Segment,
                    )),
                    ..Default::default()
                },
                format: ConcatFormat::arrow(2).with_report_skipped(true),
            },
            Preset::Tree => Profile {
                mode: Mode::Tree,
                output: PathBuf::from("tree-src.txt"),
                filter: FilterConfig {
                    exclude_dirs: strings(VCS_AND_DEPS.iter().chain(&[
                        "__pycache__",
                        ".next",
                        "dist",
                        "build",
                        "coverage",
                        "assets",
                        "ui",
                    ])),
                    exclude_names: [".DS_Store".to_string()].into(),
                    extensions: ExtensionRule::deny(MEDIA_EXTENSIONS.iter().chain(&["webp"])),
                    ..Default::default()
                },
                format: ConcatFormat::default(),
            },
        }
    }
}

fn strings<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items.into_iter().map(|s| s.as_ref().to_string()).collect()
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}

/// Everything a run needs besides the root path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub mode: Mode,
    /// Default output file, relative to the working directory.
    pub output: PathBuf,
    pub filter: FilterConfig,
    pub format: ConcatFormat,
}

impl Default for Profile {
    fn default() -> Self {
        Preset::default().profile()
    }
}

/// On-disk shape of a config file. Fields that are present replace the
/// preset's; everything else is inherited.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileFile {
    pub preset: Option<Preset>,
    pub mode: Option<Mode>,
    pub output: Option<PathBuf>,
    pub filter: Option<FilterOverlay>,
    pub format: Option<FormatOverlay>,
}

/// `[filter]` section of a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterOverlay {
    pub exclude_dirs: Option<Vec<String>>,
    pub exclude_path_keywords: Option<Vec<String>>,
    pub exclude_names: Option<BTreeSet<String>>,
    pub exclude_paths: Option<BTreeSet<String>>,
    pub extensions: Option<ExtensionRule>,
    pub keep_only: Option<BTreeMap<String, BTreeSet<String>>>,
    pub skip_subtrees: Option<Vec<SubtreeRule>>,
    pub keywords: Option<KeywordOverlay>,
}

/// `[filter.keywords]`. An empty `any_of` drops the keyword restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeywordOverlay {
    pub any_of: Option<BTreeSet<String>>,
    pub match_on: Option<KeywordMatch>,
}

impl FilterOverlay {
    pub fn apply(self, filter: &mut FilterConfig) {
        if let Some(dirs) = self.exclude_dirs {
            filter.exclude_dirs = dirs;
        }
        if let Some(keywords) = self.exclude_path_keywords {
            filter.exclude_path_keywords = keywords;
        }
        if let Some(names) = self.exclude_names {
            filter.exclude_names = names;
        }
        if let Some(paths) = self.exclude_paths {
            filter.exclude_paths = paths;
        }
        if let Some(extensions) = self.extensions {
            filter.extensions = extensions;
        }
        if let Some(keep_only) = self.keep_only {
            filter.keep_only = keep_only;
        }
        if let Some(subtrees) = self.skip_subtrees {
            filter.skip_subtrees = subtrees;
        }
        if let Some(overlay) = self.keywords {
            let base = filter.keywords.take().unwrap_or_default();
            let rule = KeywordRule::new(
                overlay.any_of.unwrap_or(base.any_of),
                overlay.match_on.unwrap_or(base.match_on),
            );
            filter.keywords = (!rule.any_of.is_empty()).then_some(rule);
        }
    }
}

/// `[format]` section of a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatOverlay {
    pub marker: Option<String>,
    pub leading_newline: Option<bool>,
    pub trailing_newlines: Option<usize>,
    pub decode: Option<DecodePolicy>,
    pub report_skipped: Option<bool>,
}

impl FormatOverlay {
    pub fn apply(self, format: &mut ConcatFormat) {
        if let Some(marker) = self.marker {
            format.marker = marker;
        }
        if let Some(leading) = self.leading_newline {
            format.leading_newline = leading;
        }
        if let Some(trailing) = self.trailing_newlines {
            format.trailing_newlines = trailing;
        }
        if let Some(decode) = self.decode {
            format.decode = decode;
        }
        if let Some(report) = self.report_skipped {
            format.report_skipped = report;
        }
    }
}

impl ProfileFile {
    /// Load a config file, choosing the parser by extension.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.display().to_string(),
            source: e,
        })?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "toml" => toml::from_str(&content).map_err(|e| ConfigError::ParseToml {
                path: path.display().to_string(),
                source: e,
            }),
            "json" => serde_json::from_str(&content).map_err(|e| ConfigError::ParseJson {
                path: path.display().to_string(),
                source: e,
            }),
            _ => Err(ConfigError::UnsupportedFormat(
                path.display().to_string(),
                ext,
            )),
        }
    }

    /// Resolve against `fallback` when the file names no preset.
    pub fn resolve(self, fallback: Preset) -> Profile {
        let mut profile = self.preset.unwrap_or(fallback).profile();
        if let Some(mode) = self.mode {
            profile.mode = mode;
        }
        if let Some(output) = self.output {
            profile.output = output;
        }
        if let Some(filter) = self.filter {
            filter.apply(&mut profile.filter);
            profile.filter = profile.filter.normalize();
        }
        if let Some(format) = self.format {
            format.apply(&mut profile.format);
        }
        profile
    }
}

impl Profile {
    /// Preset profile, or the config file resolved on top of it.
    pub fn load(config_file: Option<&Path>, preset: Preset) -> Result<Self, ConfigError> {
        match config_file {
            Some(path) => Ok(ProfileFile::from_file(path)?.resolve(preset)),
            None => Ok(preset.profile()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to parse JSON config {path}: {source}")]
    ParseJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported config format for {0}: .{1}")]
    UnsupportedFormat(String, String),

    #[error("Unknown preset '{0}' (expected minimal, sections, catalog or tree)")]
    UnknownPreset(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_preset_from_str() {
        assert_eq!("minimal".parse::<Preset>().unwrap(), Preset::Minimal);
        assert_eq!("Catalog".parse::<Preset>().unwrap(), Preset::Catalog);
        assert!(matches!(
            "fancy".parse::<Preset>(),
            Err(ConfigError::UnknownPreset(_))
        ));
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
        }
    }

    #[test]
    fn test_preset_modes_and_outputs() {
        assert_eq!(Preset::Minimal.profile().output, PathBuf::from("codigo_exportado.txt"));
        assert_eq!(Preset::Sections.profile().output, PathBuf::from("frontend_clean.txt"));
        assert_eq!(Preset::Tree.profile().mode, Mode::Tree);
        assert_eq!(Preset::Catalog.profile().mode, Mode::Concat);
    }

    #[test]
    fn test_catalog_denies_json_but_not_css() {
        let filter = Preset::Catalog.profile().filter;
        assert!(!filter.extensions.permits(Some("json")));
        assert!(filter.extensions.permits(Some("css")));
        assert!(Preset::Catalog.profile().format.report_skipped);
    }

    #[test]
    fn test_sections_is_strict_arrow_format() {
        let format = Preset::Sections.profile().format;
        assert_eq!(format.marker, ">>");
        assert_eq!(format.decode, DecodePolicy::Strict);
        assert_eq!(format.trailing_newlines, 1);
    }

    #[test]
    fn test_load_toml_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pulp.toml");
        fs::write(
            &path,
            r#"
preset = "sections"
output = "dump.txt"

[format]
marker = "=== "
trailing_newlines = 3
"#,
        )
        .unwrap();

        let profile = Profile::load(Some(&path), Preset::Minimal).unwrap();
        assert_eq!(profile.output, PathBuf::from("dump.txt"));
        assert_eq!(profile.format.marker, "=== ");
        assert_eq!(profile.format.trailing_newlines, 3);
        assert_eq!(profile.format.decode, DecodePolicy::Strict);
        assert!(profile.format.leading_newline);
        // Filter untouched, still the sections preset
        assert_eq!(profile.filter, Preset::Sections.profile().filter);
    }

    #[test]
    fn test_load_json_config_overlays_filter() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pulp.json");
        fs::write(
            &path,
            r#"{ "filter": { "exclude_dirs": ["vendor"], "extensions": { "mode": "deny", "list": [".MD"] } } }"#,
        )
        .unwrap();

        let profile = Profile::load(Some(&path), Preset::Minimal).unwrap();
        let minimal = Preset::Minimal.profile();
        assert_eq!(profile.filter.exclude_dirs, vec!["vendor"]);
        assert_eq!(profile.filter.extensions, ExtensionRule::deny(["md"]));
        assert_eq!(profile.filter.skip_subtrees, minimal.filter.skip_subtrees);
        assert_eq!(profile.filter.exclude_paths, minimal.filter.exclude_paths);
        assert_eq!(profile.format, ConcatFormat::hash());
    }

    #[test]
    fn test_partial_format_keeps_preset_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pulp.toml");
        fs::write(&path, "preset = \"sections\"\n\n[format]\nmarker = \"=== \"\n").unwrap();

        let profile = Profile::load(Some(&path), Preset::Minimal).unwrap();
        assert_eq!(profile.format.marker, "=== ");
        assert_eq!(profile.format.decode, DecodePolicy::Strict);
        assert!(profile.format.leading_newline);
        assert_eq!(profile.format.trailing_newlines, 1);
    }

    #[test]
    fn test_partial_filter_keeps_preset_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pulp.toml");
        fs::write(
            &path,
            "preset = \"catalog\"\n\n[filter]\nexclude_dirs = [\"legacy\"]\n",
        )
        .unwrap();

        let profile = Profile::load(Some(&path), Preset::Minimal).unwrap();
        let catalog = Preset::Catalog.profile().filter;
        assert_eq!(profile.filter.exclude_dirs, vec!["legacy"]);
        assert_eq!(profile.filter.keywords, catalog.keywords);
        assert_eq!(profile.filter.extensions, catalog.extensions);
        assert!(!profile.filter.extensions.permits(Some("json")));
        assert!(profile.format.report_skipped);
    }

    #[test]
    fn test_keyword_overlay() {
        let mut filter = Preset::Sections.profile().filter;
        FilterOverlay {
            keywords: Some(KeywordOverlay {
                any_of: Some(["Hero".to_string()].into()),
                match_on: None,
            }),
            ..Default::default()
        }
        .apply(&mut filter);
        assert_eq!(
            filter.keywords,
            Some(KeywordRule::new(["hero"], KeywordMatch::Path))
        );

        FilterOverlay {
            keywords: Some(KeywordOverlay {
                any_of: Some(BTreeSet::new()),
                match_on: None,
            }),
            ..Default::default()
        }
        .apply(&mut filter);
        assert_eq!(filter.keywords, None);
    }

    #[test]
    fn test_misspelled_filter_field_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pulp.toml");
        fs::write(&path, "[filter]\nexclude_dir = [\"legacy\"]\n").unwrap();
        assert!(matches!(
            Profile::load(Some(&path), Preset::Catalog),
            Err(ConfigError::ParseToml { .. })
        ));

        fs::write(&path, "[format]\ndecoding = \"strict\"\n").unwrap();
        assert!(matches!(
            Profile::load(Some(&path), Preset::Catalog),
            Err(ConfigError::ParseToml { .. })
        ));

        fs::write(&path, "[filter.keywords]\nanyof = [\"x\"]\n").unwrap();
        assert!(matches!(
            Profile::load(Some(&path), Preset::Catalog),
            Err(ConfigError::ParseToml { .. })
        ));
    }

    #[test]
    fn test_parse_toml_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pulp.toml");
        fs::write(&path, "[invalid toml\nkey = ").unwrap();
        assert!(matches!(
            Profile::load(Some(&path), Preset::Minimal),
            Err(ConfigError::ParseToml { .. })
        ));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pulp.toml");
        fs::write(&path, "colour = true\n").unwrap();
        assert!(matches!(
            Profile::load(Some(&path), Preset::Minimal),
            Err(ConfigError::ParseToml { .. })
        ));
    }

    #[test]
    fn test_unsupported_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pulp.yaml");
        fs::write(&path, "preset: tree\n").unwrap();
        assert!(matches!(
            Profile::load(Some(&path), Preset::Minimal),
            Err(ConfigError::UnsupportedFormat(_, ext)) if ext == "yaml"
        ));
    }

    #[test]
    fn test_missing_config_file() {
        assert!(matches!(
            Profile::load(Some(Path::new("/nonexistent/pulp.toml")), Preset::Minimal),
            Err(ConfigError::ReadFile { .. })
        ));
    }
}
