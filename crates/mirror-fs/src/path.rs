//! Normalized relative paths for stable record keys

use std::path::{Component, Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Record entries key on these so a record written on one platform keeps
/// matching on another. Conversion to a native path happens only at I/O
/// boundaries via [`NormalizedPath::under`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Segments are taken from the platform's own component split and joined
    /// with `/`. A backslash is a separator only where the platform says so;
    /// on Unix it stays part of the file name.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let segments: Vec<_> = path
            .as_ref()
            .components()
            .filter_map(|component| match component {
                Component::Normal(segment) => Some(segment.to_string_lossy()),
                Component::ParentDir => Some("..".into()),
                Component::CurDir | Component::RootDir | Component::Prefix(_) => None,
            })
            .collect();
        Self {
            inner: segments.join("/"),
        }
    }

    /// Express `path` relative to `root`.
    ///
    /// Returns `None` when `path` does not live under `root`.
    pub fn relative(root: &Path, path: &Path) -> Option<Self> {
        path.strip_prefix(root).ok().map(Self::new)
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Resolve this relative path beneath an absolute root.
    pub fn under(&self, root: &Path) -> PathBuf {
        self.inner
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(root.to_path_buf(), |acc, segment| acc.join(segment))
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the extension, without the leading dot.
    ///
    /// The extension starts after the final dot of the file name. A file
    /// name that is only a dot-prefixed word (`.flac`) counts as all
    /// extension.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        let idx = name.rfind('.')?;
        Some(&name[idx + 1..])
    }

    /// Replace the extension with `extension`.
    ///
    /// A path without an extension gets one appended.
    pub fn with_extension(&self, extension: &str) -> Self {
        let stem_len = match self.extension() {
            Some(current) => self.inner.len() - current.len() - 1,
            None => self.inner.len(),
        };
        Self {
            inner: format!("{}.{}", &self.inner[..stem_len], extension),
        }
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}
