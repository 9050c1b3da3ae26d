//! Source Path Resolution
//!
//! Turns an entry of `sources` into the location a debugger would load,
//! using `sourceRoot` and the URL the map was retrieved from.

use crate::error::{Result, SourceMapError};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};
use url::Url;

static WINDOWS_ABSOLUTE_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]:[\\/]").unwrap());

/// Where relative sources are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Base {
    /// Absolute URL whose path is a directory (ends with `/`).
    Url(Url),
    /// Plain filesystem-like root.
    Root(String),
    None,
}

/// Resolves raw `sources` entries.
///
/// Everything is computed once; [`SourceResolver::resolve`] only builds
/// fresh values and can be shared across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceResolver {
    base: Base,
}

impl SourceResolver {
    /// `source_root` is the document's `sourceRoot`, `retrieval_url` the
    /// location of the map itself. Either may be empty.
    pub fn new(source_root: &str, retrieval_url: &str) -> Result<Self> {
        let retrieval = parse_absolute_url(retrieval_url)?;
        if retrieval_url.is_empty() {
            trace!("no retrieval URL");
        } else if retrieval.is_none() {
            debug!(url = retrieval_url, "retrieval URL is not absolute, ignoring it");
        }

        let base = if source_root.is_empty() {
            match retrieval {
                Some(url) => Base::Url(directory_of(url)),
                None => Base::None,
            }
        } else if let Some(root) = parse_absolute_url(source_root)? {
            Base::Url(as_directory(root))
        } else {
            // A plain root wins over the retrieval location.
            Base::Root(source_root.to_string())
        };
        trace!(base = ?base, "source resolution base");

        Ok(Self { base })
    }

    /// Base URL relative sources are joined onto, if any.
    pub fn base_url(&self) -> Option<&Url> {
        match &self.base {
            Base::Url(url) => Some(url),
            _ => None,
        }
    }

    pub fn resolve(&self, source: &str) -> String {
        if source.is_empty() || is_absolute_path(source) || is_absolute_url(source) {
            return source.to_string();
        }
        match &self.base {
            Base::Url(base) => {
                let mut url = base.clone();
                url.set_path(&clean_path(&join_paths(base.path(), source)));
                url.set_query(None);
                url.set_fragment(None);
                url.to_string()
            }
            Base::Root(root) => clean_path(&join_paths(root, source)),
            Base::None => source.to_string(),
        }
    }
}

/// Parses `input` as an absolute URL.
///
/// Relative references and drive-letter paths yield `None`; anything else
/// that fails to parse is an error.
fn parse_absolute_url(input: &str) -> Result<Option<Url>> {
    if input.is_empty() || is_absolute_path(input) {
        return Ok(None);
    }
    match Url::parse(input) {
        Ok(url) => Ok(Some(url)),
        Err(url::ParseError::RelativeUrlWithoutBase) => Ok(None),
        Err(source) => Err(SourceMapError::InvalidUrl {
            url: input.to_string(),
            source,
        }),
    }
}

fn is_absolute_url(input: &str) -> bool {
    !is_absolute_path(input) && Url::parse(input).is_ok()
}

/// `/unix/path`, `C:\windows\path` or `C:/windows/path`.
pub fn is_absolute_path(path: &str) -> bool {
    path.starts_with('/') || WINDOWS_ABSOLUTE_PATH.is_match(path)
}

fn directory_of(mut url: Url) -> Url {
    let dir = match url.path().rfind('/') {
        Some(pos) => url.path()[..=pos].to_string(),
        None => "/".to_string(),
    };
    url.set_path(&dir);
    url.set_query(None);
    url.set_fragment(None);
    url
}

fn as_directory(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let dir = format!("{}/", url.path());
        url.set_path(&dir);
    }
    url
}

fn join_paths(base: &str, path: &str) -> String {
    if base.is_empty() {
        path.to_string()
    } else if base.ends_with('/') || base.ends_with('\\') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// Lexically normalize a `/` separated path.
///
/// Removes `.` and empty segments and folds `..` into its parent. Leading
/// `..` segments of a relative path are kept; at the root they are dropped.
pub fn clean_path(path: &str) -> String {
    let normalized = path.replace('\\', "/");

    let drive_prefix = if WINDOWS_ABSOLUTE_PATH.is_match(&normalized) {
        &normalized[..2]
    } else {
        ""
    };
    let path_part = &normalized[drive_prefix.len()..];
    let rooted = path_part.starts_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in path_part.split('/') {
        match segment {
            "" | "." => continue,
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if rooted {
        format!("{}/{}", drive_prefix, joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}
