use crate::error::AppError;
use std::path::{Component, Path, PathBuf};

/// Lexically canonicalize a path: `.` is dropped, `..` pops, separators
/// collapse. Never touches the filesystem, so paths that do not exist
/// yet (create/move/copy targets) resolve the same as existing ones.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut ret = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(..) => ret.push(component.as_os_str()),
            Component::RootDir => ret.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                ret.pop();
            }
            Component::Normal(c) => ret.push(c),
        }
    }
    ret
}

/// Single authority for mapping client-supplied relative paths onto the
/// storage root.
///
/// Every operation resolves its path arguments here and aborts with
/// `PermissionDenied` before any filesystem access when the result falls
/// outside the root. Resolution is purely lexical: a symlink inside the
/// root that points outside it is not chased (that would take real I/O
/// on paths that may not exist yet).
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// `root` should be absolute (config anchors relative roots at load
    /// time); it is normalized once here and never changes afterwards.
    pub fn new(root: PathBuf) -> Self {
        Self {
            root: normalize_path(&root),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join a client path onto the root and canonicalize.
    ///
    /// Client paths are always root-relative: `/a/b` on the wire means
    /// `<root>/a/b`, so the leading slash is stripped before joining.
    /// (`PathBuf::join` would otherwise discard the root entirely for an
    /// "absolute" argument.)
    pub fn resolve(&self, relative: &str) -> PathBuf {
        let trimmed = relative.trim_start_matches('/');
        normalize_path(&self.root.join(trimmed))
    }

    /// True iff `path` is the storage root or a descendant of it.
    ///
    /// `Path::starts_with` compares whole components, so for a root of
    /// `/data/store` the sibling `/data/storeBackup` does not pass the
    /// way a raw string-prefix test would let it.
    pub fn is_contained(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
    }

    /// Resolve and enforce containment in one step; the form every
    /// storage operation uses.
    pub fn resolve_checked(&self, relative: &str) -> Result<PathBuf, AppError> {
        let resolved = self.resolve(relative);
        if !self.is_contained(&resolved) {
            return Err(AppError::PermissionDenied(format!(
                "path is outside the storage root: {}",
                relative
            )));
        }
        Ok(resolved)
    }
}
