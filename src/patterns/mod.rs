//! Attachment pattern matching.
//!
//! Patterns are shell globs (`*`, `?`, `[seq]`, `[!seq]`) applied to the whole
//! leaf name of a directory entry. A name is an attachment when any pattern
//! matches it; the order of the patterns never changes which names qualify.

pub mod error;

pub use error::PatternError;

use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};

use glob::{MatchOptions, Pattern as GlobPattern};

/// Leaf names only: no separator handling, dotfiles match `*`, and case
/// sensitivity follows the platform.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: !cfg!(windows),
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// A single compiled attachment glob
#[derive(Debug, Clone)]
pub struct AttachmentPattern {
    original: String,
    glob: GlobPattern,
}

impl AttachmentPattern {
    /// Compile a glob pattern.
    ///
    /// Shell glob forms the `glob` crate would reject are rewritten first: a
    /// run of `*` matches like a single `*`, and a `[` without a closing `]`
    /// is a literal bracket.
    ///
    /// # Errors
    /// * Returns `PatternError::InvalidEmpty` if `p` is empty.
    /// * Returns `PatternError::InvalidGlob` if the glob syntax is invalid.
    pub fn new(p: &str) -> Result<Self, PatternError> {
        if p.is_empty() {
            return Err(PatternError::InvalidEmpty);
        }
        GlobPattern::new(&to_glob_syntax(p))
            .map(|g| Self {
                original: p.to_string(),
                glob: g,
            })
            .map_err(|e| PatternError::glob_parse(p, &e.to_string()))
    }

    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Match a leaf name. Names that are not valid UTF-8 are matched lossily.
    #[must_use]
    pub fn matches(&self, name: &OsStr) -> bool {
        self.glob
            .matches_with(&name.to_string_lossy(), MATCH_OPTIONS)
    }
}

impl PartialEq for AttachmentPattern {
    fn eq(&self, other: &Self) -> bool {
        self.original == other.original
    }
}

impl Eq for AttachmentPattern {}

/// Ordered set of attachment patterns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSet {
    patterns: Vec<AttachmentPattern>,
}

impl PatternSet {
    /// Compile every pattern in order.
    ///
    /// # Errors
    /// * Returns `PatternError::NoPatterns` if `patterns` is empty.
    /// * Returns the first compilation error otherwise.
    pub fn new<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| AttachmentPattern::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        if patterns.is_empty() {
            return Err(PatternError::NoPatterns);
        }
        Ok(Self { patterns })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttachmentPattern> {
        self.patterns.iter()
    }

    /// First pattern (in configured order) that matches `name`
    #[must_use]
    pub fn first_match(&self, name: &OsStr) -> Option<&AttachmentPattern> {
        self.patterns.iter().find(|p| p.matches(name))
    }

    #[must_use]
    pub fn is_match(&self, name: &OsStr) -> bool {
        self.first_match(name).is_some()
    }

    /// Names from one directory listing that qualify as attachments.
    ///
    /// `exclude` is never part of the result, even when a pattern matches it.
    pub fn match_attachments<I, N>(&self, listing: I, exclude: Option<&OsStr>) -> BTreeSet<OsString>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<OsStr>,
    {
        listing
            .into_iter()
            .filter(|name| exclude != Some(name.as_ref()))
            .filter(|name| self.is_match(name.as_ref()))
            .map(|name| name.as_ref().to_os_string())
            .collect()
    }
}

/// Rewrite shell glob syntax into the dialect `glob::Pattern` parses.
fn to_glob_syntax(p: &str) -> String {
    let chars: Vec<char> = p.chars().collect();
    let mut out = String::with_capacity(p.len());
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => {
                out.push('*');
                while chars.get(i + 1) == Some(&'*') {
                    i += 1;
                }
            }
            '[' => {
                let mut j = i + 1;
                if chars.get(j) == Some(&'!') {
                    j += 1;
                }
                if chars.get(j) == Some(&']') {
                    j += 1;
                }
                while j < chars.len() && chars[j] != ']' {
                    j += 1;
                }
                if j < chars.len() {
                    out.extend(&chars[i..=j]);
                    i = j;
                } else {
                    out.push_str("[[]");
                }
            }
            c => out.push(c),
        }
        i += 1;
    }
    out
}
