//! Filter predicates evaluated against paths relative to the walk root

use std::fmt;
use std::path::Path;

use super::config::{FilterConfig, KeywordMatch};
use super::utils::{display_relative, entry_name, lowercase_extension, name_matches, segments};

/// Why a file did not make it into the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Containing directory mentions none of the required keywords.
    OutsideKeywords,
    ExcludedPath,
    ExcludedName,
    Extension,
    /// Extension is restricted to specific basenames and this is not one of them.
    NotKept,
    InvalidUtf8,
    /// Trimmed content is empty.
    Empty,
    Unreadable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::OutsideKeywords => write!(f, "outside keyword directories"),
            SkipReason::ExcludedPath => write!(f, "excluded path"),
            SkipReason::ExcludedName => write!(f, "excluded name"),
            SkipReason::Extension => write!(f, "excluded extension"),
            SkipReason::NotKept => write!(f, "not in keep-only list"),
            SkipReason::InvalidUtf8 => write!(f, "invalid UTF-8"),
            SkipReason::Empty => write!(f, "empty"),
            SkipReason::Unreadable(msg) => write!(f, "unreadable: {}", msg),
        }
    }
}

/// Outcome of path-level filtering for a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Include,
    Skip(SkipReason),
}

impl Decision {
    pub fn is_include(&self) -> bool {
        matches!(self, Decision::Include)
    }
}

/// Path predicates over a borrowed [`FilterConfig`].
#[derive(Debug, Clone, Copy)]
pub struct PathFilter<'a> {
    config: &'a FilterConfig,
}

impl<'a> PathFilter<'a> {
    pub fn new(config: &'a FilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &'a FilterConfig {
        self.config
    }

    /// Check whether a directory name matches the directory denylist.
    pub fn is_excluded_dir_name(&self, name: &str) -> bool {
        self.config
            .exclude_dirs
            .iter()
            .any(|pattern| name_matches(pattern, name))
    }

    /// Check whether a directory (relative to the root) must be pruned.
    ///
    /// Only the last segment is tested against the name denylist; ancestors
    /// were already tested on the way down.
    pub fn prunes_dir(&self, relative: &Path) -> bool {
        let segs = segments(relative);
        let Some((name, ancestors)) = segs.split_last() else {
            return false;
        };

        if self.is_excluded_dir_name(name) {
            return true;
        }

        if self.has_path_keyword(&segs) {
            return true;
        }

        self.config
            .skip_subtrees
            .iter()
            .any(|rule| *name == rule.name && ancestors.iter().any(|a| *a == rule.ancestor))
    }

    fn has_path_keyword(&self, segs: &[String]) -> bool {
        if self.config.exclude_path_keywords.is_empty() {
            return false;
        }
        segs.iter().any(|seg| {
            let seg = seg.to_lowercase();
            self.config
                .exclude_path_keywords
                .iter()
                .any(|kw| seg.contains(&kw.to_lowercase()))
        })
    }

    /// Check whether a directory satisfies the keyword restriction.
    ///
    /// Always true when no keyword rule is configured.
    pub fn matches_keywords(&self, dir_relative: &Path) -> bool {
        let Some(rule) = &self.config.keywords else {
            return true;
        };

        match rule.match_on {
            KeywordMatch::Segment => segments(dir_relative).iter().any(|seg| {
                let seg = seg.to_lowercase();
                rule.any_of.iter().any(|kw| seg.contains(kw.as_str()))
            }),
            KeywordMatch::Path => {
                let path = display_relative(dir_relative).to_lowercase();
                rule.any_of.iter().any(|kw| path.contains(kw.as_str()))
            }
        }
    }

    /// Decide a file that lives in a directory with the given keyword verdict.
    pub fn decide_file(&self, relative: &Path, dir_matches_keywords: bool) -> Decision {
        if !dir_matches_keywords {
            return Decision::Skip(SkipReason::OutsideKeywords);
        }

        if self
            .config
            .exclude_paths
            .contains(&display_relative(relative))
        {
            return Decision::Skip(SkipReason::ExcludedPath);
        }

        let name = entry_name(relative);
        if self.config.exclude_names.contains(&name) {
            return Decision::Skip(SkipReason::ExcludedName);
        }

        let ext = lowercase_extension(relative);
        if !self.config.extensions.permits(ext.as_deref()) {
            return Decision::Skip(SkipReason::Extension);
        }

        if let Some(kept) = ext.as_ref().and_then(|e| self.config.keep_only.get(e)) {
            if !kept.contains(&name) {
                return Decision::Skip(SkipReason::NotKept);
            }
        }

        Decision::Include
    }

    /// Entry-level denylist check used by the tree builder.
    ///
    /// Keyword restrictions and keep-only lists do not apply to the tree.
    pub fn excludes_tree_entry(&self, relative: &Path, is_dir: bool) -> bool {
        let name = entry_name(relative);
        if is_dir {
            return self.prunes_dir(relative);
        }
        if self.is_excluded_dir_name(&name) || self.config.exclude_names.contains(&name) {
            return true;
        }
        if self
            .config
            .exclude_paths
            .contains(&display_relative(relative))
        {
            return true;
        }
        !self
            .config
            .extensions
            .permits(lowercase_extension(relative).as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walk::config::{ExtensionRule, KeywordRule, SubtreeRule};

    fn p(s: &str) -> &Path {
        Path::new(s)
    }

    #[test]
    fn test_prunes_dir_by_name_and_glob() {
        let config = FilterConfig {
            exclude_dirs: vec!["node_modules".into(), "*.egg-info".into()],
            ..Default::default()
        };
        let filter = PathFilter::new(&config);
        assert!(filter.prunes_dir(p("node_modules")));
        assert!(filter.prunes_dir(p("pkg/node_modules")));
        assert!(filter.prunes_dir(p("pulp.egg-info")));
        assert!(!filter.prunes_dir(p("modules")));
        assert!(!filter.prunes_dir(p("")), "root is never pruned");
    }

    #[test]
    fn test_prunes_ui_only_under_components() {
        let config = FilterConfig {
            skip_subtrees: vec![SubtreeRule::new("ui", "components")],
            ..Default::default()
        };
        let filter = PathFilter::new(&config);
        assert!(filter.prunes_dir(p("components/ui")));
        assert!(filter.prunes_dir(p("shared/components/forms/ui")));
        assert!(!filter.prunes_dir(p("ui")));
        assert!(!filter.prunes_dir(p("widgets/ui")));
        assert!(!filter.prunes_dir(p("components")));
    }

    #[test]
    fn test_prunes_by_path_keyword() {
        let config = FilterConfig {
            exclude_path_keywords: vec![".json".into()],
            ..Default::default()
        };
        let filter = PathFilter::new(&config);
        assert!(filter.prunes_dir(p("fixtures/data.JSON")));
        assert!(!filter.prunes_dir(p("fixtures/json")));
    }

    #[test]
    fn test_keyword_segment_vs_path() {
        let segment = FilterConfig {
            keywords: Some(KeywordRule::new(["catalog"], KeywordMatch::Segment)),
            ..Default::default()
        };
        let filter = PathFilter::new(&segment);
        assert!(filter.matches_keywords(p("modules/Catalog/components")));
        assert!(!filter.matches_keywords(p("modules/projects")));
        assert!(!filter.matches_keywords(p("")));

        let path = FilterConfig {
            keywords: Some(KeywordRule::new(["s/cat"], KeywordMatch::Path)),
            ..Default::default()
        };
        let filter = PathFilter::new(&path);
        assert!(filter.matches_keywords(p("modules/catalog")));
        assert!(!filter.matches_keywords(p("catalog")));
    }

    #[test]
    fn test_no_keyword_rule_matches_everything() {
        let config = FilterConfig::default();
        assert!(PathFilter::new(&config).matches_keywords(p("")));
    }

    #[test]
    fn test_decide_file_order_of_checks() {
        let mut config = FilterConfig {
            exclude_paths: ["data/categories.json".to_string()].into(),
            exclude_names: [".DS_Store".to_string()].into(),
            extensions: ExtensionRule::deny(["png"]),
            ..Default::default()
        };
        config
            .keep_only
            .insert("css".into(), ["App.css".to_string(), "index.css".to_string()].into());
        let filter = PathFilter::new(&config);

        assert_eq!(
            filter.decide_file(p("data/categories.json"), true),
            Decision::Skip(SkipReason::ExcludedPath)
        );
        assert_eq!(
            filter.decide_file(p("data/categories.json"), false),
            Decision::Skip(SkipReason::OutsideKeywords)
        );
        assert_eq!(
            filter.decide_file(p("assets/.DS_Store"), true),
            Decision::Skip(SkipReason::ExcludedName)
        );
        assert_eq!(
            filter.decide_file(p("assets/logo.PNG"), true),
            Decision::Skip(SkipReason::Extension)
        );
        assert_eq!(
            filter.decide_file(p("styles/theme.css"), true),
            Decision::Skip(SkipReason::NotKept)
        );
        assert_eq!(filter.decide_file(p("App.css"), true), Decision::Include);
        assert_eq!(filter.decide_file(p("data/products.ts"), true), Decision::Include);
    }

    #[test]
    fn test_tree_entry_ignores_keywords() {
        let config = FilterConfig {
            exclude_dirs: vec!["assets".into()],
            extensions: ExtensionRule::deny(["png"]),
            keywords: Some(KeywordRule::new(["catalog"], KeywordMatch::Segment)),
            ..Default::default()
        };
        let filter = PathFilter::new(&config);
        assert!(filter.excludes_tree_entry(p("assets"), true));
        assert!(filter.excludes_tree_entry(p("logo.png"), false));
        assert!(!filter.excludes_tree_entry(p("pages/Home.tsx"), false));
        assert!(!filter.excludes_tree_entry(p("pages"), true));
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::Empty.to_string(), "empty");
        assert_eq!(
            SkipReason::Unreadable("permission denied".into()).to_string(),
            "unreadable: permission denied"
        );
    }
}
