//! Filter configuration shared by the walkers

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Which file extensions survive filtering.
///
/// Extensions are stored lower-case and without the leading dot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "list", rename_all = "lowercase")]
pub enum ExtensionRule {
    /// Every extension passes.
    #[default]
    Any,
    /// Listed extensions are rejected.
    Deny(BTreeSet<String>),
    /// Only listed extensions pass; files without an extension are rejected.
    Allow(BTreeSet<String>),
}

impl ExtensionRule {
    pub fn deny<I, S>(exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ExtensionRule::Deny(normalize_extensions(exts))
    }

    pub fn allow<I, S>(exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ExtensionRule::Allow(normalize_extensions(exts))
    }

    /// Check whether a (lower-cased, dotless) extension passes the rule.
    pub fn permits(&self, ext: Option<&str>) -> bool {
        match self {
            ExtensionRule::Any => true,
            ExtensionRule::Deny(set) => ext.is_none_or(|e| !set.contains(e)),
            ExtensionRule::Allow(set) => ext.is_some_and(|e| set.contains(e)),
        }
    }

    /// Exclude additional extensions.
    ///
    /// For an allowlist this removes them; otherwise they join the denylist.
    pub fn exclude<I, S>(&mut self, exts: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extra = normalize_extensions(exts);
        if extra.is_empty() {
            return;
        }
        match self {
            ExtensionRule::Any => *self = ExtensionRule::Deny(extra),
            ExtensionRule::Deny(set) => set.extend(extra),
            ExtensionRule::Allow(set) => set.retain(|e| !extra.contains(e)),
        }
    }
}

/// Normalize user-supplied extensions: strip a leading dot, lower-case.
pub fn normalize_extensions<I, S>(exts: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    exts.into_iter()
        .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Prune a directory named `name` when one of its ancestors is `ancestor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubtreeRule {
    pub name: String,
    pub ancestor: String,
}

impl SubtreeRule {
    pub fn new(name: impl Into<String>, ancestor: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ancestor: ancestor.into(),
        }
    }
}

/// How keywords are matched against a directory's relative path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordMatch {
    /// Keyword is a substring of some path segment (case-insensitive).
    #[default]
    Segment,
    /// Keyword is a substring of the lower-cased relative path string.
    Path,
}

/// Restrict output to directories whose path mentions at least one keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeywordRule {
    pub any_of: BTreeSet<String>,
    pub match_on: KeywordMatch,
}

impl KeywordRule {
    pub fn new<I, S>(keywords: I, match_on: KeywordMatch) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            any_of: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            match_on,
        }
    }
}

/// Declarative filter rules for a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Directory names (or glob patterns) pruned before descent.
    pub exclude_dirs: Vec<String>,
    /// Prune directories whose relative path has a segment containing one of these.
    pub exclude_path_keywords: Vec<String>,
    /// Exact basenames skipped wherever they appear.
    pub exclude_names: BTreeSet<String>,
    /// Exact paths relative to the root, using `/` separators.
    pub exclude_paths: BTreeSet<String>,
    pub extensions: ExtensionRule,
    /// extension -> basenames; among files with that extension only these survive.
    pub keep_only: BTreeMap<String, BTreeSet<String>>,
    pub skip_subtrees: Vec<SubtreeRule>,
    pub keywords: Option<KeywordRule>,
}

impl FilterConfig {
    /// Bring hand-written values (config files) into canonical form:
    /// dotless lower-case extensions and lower-case keywords.
    pub fn normalize(mut self) -> Self {
        self.extensions = match self.extensions {
            ExtensionRule::Any => ExtensionRule::Any,
            ExtensionRule::Deny(set) => ExtensionRule::deny(set),
            ExtensionRule::Allow(set) => ExtensionRule::allow(set),
        };
        self.keep_only = self
            .keep_only
            .into_iter()
            .filter_map(|(ext, names)| {
                normalize_extensions([ext]).pop_first().map(|ext| (ext, names))
            })
            .collect();
        self.keywords = self
            .keywords
            .map(|rule| KeywordRule::new(rule.any_of, rule.match_on));
        self
    }

    /// Add keywords, creating a segment-matched rule if none is configured.
    pub fn add_keywords<I, S>(&mut self, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extra = KeywordRule::new(keywords, KeywordMatch::Segment);
        if extra.any_of.is_empty() {
            return;
        }
        match self.keywords.as_mut() {
            Some(rule) => rule.any_of.extend(extra.any_of),
            None => self.keywords = Some(extra),
        }
    }
}
