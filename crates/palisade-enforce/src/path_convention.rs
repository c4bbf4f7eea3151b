//! The mapping between file paths and the constants they define.
//!
//! Directories beneath a package's source root each contribute one namespace
//! segment, after the first ("autoload") directory, which contributes none:
//!
//! ```text
//! packs/apples/app/services/apples/tool.rb   -> Apples::Tool
//! packs/apples/app/models/concerns/ripe.rb   -> Ripe  (models/concerns is one slot)
//! ```

use std::collections::HashMap;

use palisade_core::config::ConventionConfig;
use palisade_core::types::Package;

/// A file path split along the convention's boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionPath {
    /// `app`
    pub source_root: String,
    /// `services`, or `models/concerns` for a shared concern directory.
    pub autoload_dir: String,
    /// Remaining path segments, extension stripped from the last.
    pub segments: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PathConvention {
    source_roots: Vec<String>,
    shared_concern_dir: String,
    extension: String,
    /// lowercase -> replacement
    acronyms: HashMap<String, String>,
    /// replacements, longest first
    acronym_words: Vec<String>,
}

impl PathConvention {
    pub fn new(config: &ConventionConfig) -> Self {
        let acronyms = config
            .acronyms
            .iter()
            .map(|a| (a.to_lowercase(), a.clone()))
            .collect();
        let mut acronym_words = config.acronyms.clone();
        acronym_words.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        Self {
            source_roots: config.source_roots.clone(),
            shared_concern_dir: config.shared_concern_dir.clone(),
            extension: config.extension.trim_start_matches('.').to_string(),
            acronyms,
            acronym_words,
        }
    }

    pub fn source_roots(&self) -> &[String] {
        &self.source_roots
    }

    pub fn shared_concern_dir(&self) -> &str {
        &self.shared_concern_dir
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// `snake_case` path segment to `CamelCase` constant segment.
    pub fn camelize(&self, word: &str) -> String {
        word.split('_')
            .map(|part| match self.acronyms.get(part) {
                Some(acronym) => acronym.clone(),
                None => capitalize_first(part),
            })
            .collect()
    }

    /// Constant name to path: `Foo::HTMLParser` -> `foo/html_parser`.
    pub fn underscore(&self, name: &str) -> String {
        name.trim_start_matches("::")
            .split("::")
            .map(|segment| self.underscore_segment(segment))
            .collect::<Vec<_>>()
            .join("/")
    }

    fn underscore_segment(&self, segment: &str) -> String {
        let chars: Vec<char> = segment.chars().collect();
        let mut out = String::with_capacity(segment.len() + 4);
        let mut i = 0;
        while i < chars.len() {
            if let Some(len) = self.acronym_at(&chars, i) {
                if i > 0 && !out.ends_with('_') {
                    out.push('_');
                }
                out.extend(chars[i..i + len].iter().flat_map(|c| c.to_lowercase()));
                i += len;
                continue;
            }
            let c = chars[i];
            if c.is_uppercase() {
                let prev = i.checked_sub(1).map(|p| chars[p]);
                let next = chars.get(i + 1).copied();
                let boundary = match prev {
                    Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                    Some(p) if p.is_uppercase() => next.is_some_and(|n| n.is_lowercase()),
                    _ => false,
                };
                if boundary && !out.ends_with('_') {
                    out.push('_');
                }
                out.extend(c.to_lowercase());
            } else {
                out.push(c);
            }
            i += 1;
        }
        out
    }

    /// Length of a configured acronym starting at `i` and not running into a
    /// lowercase letter.
    fn acronym_at(&self, chars: &[char], i: usize) -> Option<usize> {
        self.acronym_words.iter().find_map(|acronym| {
            let word: Vec<char> = acronym.chars().collect();
            let end = i + word.len();
            if end > chars.len() || chars[i..end] != word[..] {
                return None;
            }
            match chars.get(end) {
                Some(c) if c.is_lowercase() => None,
                _ => Some(word.len()),
            }
        })
    }

    /// Split `path` (repo-relative) into its convention parts, or `None` when
    /// the path is outside every source root of `package`.
    pub fn locate(&self, path: &str, package: &Package) -> Option<ConventionPath> {
        let within = path.strip_prefix(&package.path_prefix())?;
        let (root_dir, rest) = within.split_once('/')?;
        if !self.source_roots.iter().any(|r| r == root_dir) {
            return None;
        }

        let parts: Vec<&str> = rest.split('/').collect();
        let take = if parts.len() > 2 && parts[1] == self.shared_concern_dir {
            2
        } else {
            1
        };
        if parts.len() <= take {
            return None;
        }

        let suffix = format!(".{}", self.extension);
        let mut segments: Vec<String> = parts[take..].iter().map(|s| s.to_string()).collect();
        let last = segments.pop()?;
        segments.push(last.strip_suffix(&suffix)?.to_string());
        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }

        Some(ConventionPath {
            source_root: root_dir.to_string(),
            autoload_dir: parts[..take].join("/"),
            segments,
        })
    }

    /// The constant segments a file is expected to establish.
    pub fn expected_namespace_segments(&self, path: &str, package: &Package) -> Option<Vec<String>> {
        self.locate(path, package)
            .map(|loc| loc.segments.iter().map(|s| self.camelize(s)).collect())
    }

    /// Inverse of [`PathConvention::expected_namespace_segments`]: where a
    /// constant belongs inside `package`, under its own namespace directory.
    pub fn expected_path(
        &self,
        segments: &[String],
        package: &Package,
        source_root: &str,
        autoload_dir: &str,
    ) -> String {
        let mut parts: Vec<String> = segments.iter().map(|s| self.underscore(s)).collect();
        let own = package.last_name();
        if parts.first().map(String::as_str) != Some(own) {
            parts.insert(0, own.to_string());
        }
        package.join(&format!(
            "{}/{}/{}.{}",
            source_root,
            autoload_dir,
            parts.join("/"),
            self.extension
        ))
    }

    /// The namespace a package's files are expected to live in.
    pub fn package_namespace(&self, package: &Package) -> String {
        self.camelize(package.last_name())
    }
}

fn capitalize_first(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
