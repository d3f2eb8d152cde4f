use crate::error::AppError;
use crate::storage::resolver::PathResolver;
use crate::storage::types::FileItem;
use crate::utils::mime::mime_guess;
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;

/// Filesystem operations confined to a single storage root.
///
/// Every path argument is a client path (root-relative, `/`-prefixed);
/// containment is enforced through the resolver before any I/O happens.
pub struct Storage {
    resolver: PathResolver,
}

impl Storage {
    pub fn new(resolver: PathResolver) -> Self {
        Self { resolver }
    }

    pub fn root(&self) -> &Path {
        self.resolver.root()
    }

    /// List the entries of the directory at `source`.
    pub async fn list(&self, source: &str) -> Result<Vec<FileItem>, AppError> {
        let dir = self.resolver.resolve_checked(source)?;

        let mut entries = fs::read_dir(&dir).await?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            let name = entry.file_name().to_string_lossy().into_owned();
            files.push(FileItem {
                path: client_path(source, &name),
                size: metadata.len(),
                create_time: epoch_millis(metadata.created()),
                modify_time: epoch_millis(metadata.modified()),
                is_file: metadata.is_file(),
                mime_type: mime_guess(Path::new(&name)),
                name,
            });
        }
        Ok(files)
    }

    /// Create a file (`payload` present) or a directory (`payload`
    /// absent) named `filename` inside the directory at `dest`.
    ///
    /// Only the final component of `filename` is used, so a name like
    /// `nested/inner.txt` cannot place the entry anywhere but directly
    /// under `dest`. Without `overwrite` an existing target is rejected
    /// up front; with it no existence check happens at all and the
    /// filesystem's own semantics apply (file writes replace content,
    /// directory creation over an existing entry fails).
    pub async fn create(
        &self,
        dest: &str,
        filename: &str,
        payload: Option<&[u8]>,
        overwrite: bool,
    ) -> Result<(), AppError> {
        let dir = self.resolver.resolve_checked(dest)?;
        let name = match Path::new(filename).file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => {
                return Err(AppError::Validation(format!(
                    "invalid file name: {}",
                    filename
                )))
            }
        };
        let target = dir.join(name);

        if !overwrite && target.exists() {
            return Err(AppError::AlreadyExists(format!(
                "destination already exists: {}",
                client_path(dest, name)
            )));
        }

        match payload {
            Some(bytes) => fs::write(&target, bytes).await?,
            None => fs::create_dir(&target).await?,
        }
        Ok(())
    }

    /// Move the entry at `source` to `dest`.
    pub async fn rename(&self, source: &str, dest: &str) -> Result<(), AppError> {
        let from = self.resolver.resolve_checked(source)?;
        if !from.exists() {
            return Err(AppError::NotFound(format!(
                "no such file or directory: {}",
                source
            )));
        }
        let to = self.resolver.resolve_checked(dest)?;

        fs::rename(&from, &to).await?;
        Ok(())
    }

    /// Copy the file or directory tree at `source` to `dest`, which
    /// must not exist yet.
    pub async fn copy(&self, source: &str, dest: &str) -> Result<(), AppError> {
        let from = self.resolver.resolve_checked(source)?;
        if !from.exists() {
            return Err(AppError::NotFound(format!(
                "no such file or directory: {}",
                source
            )));
        }
        let to = self.resolver.resolve_checked(dest)?;
        if to.exists() {
            return Err(AppError::AlreadyExists(format!(
                "destination already exists: {}",
                dest
            )));
        }

        // Directory trees are walked synchronously off the runtime;
        // per-entry async hops would just add overhead here.
        let result = tokio::task::spawn_blocking(move || copy_recursively(&from, &to))
            .await
            .map_err(|err| AppError::Internal(format!("copy task failed: {}", err)))?;
        result.map_err(AppError::from)
    }

    /// Delete the entry at `dest`; directories are removed recursively.
    pub async fn remove(&self, dest: &str) -> Result<(), AppError> {
        let target = self.resolver.resolve_checked(dest)?;

        // symlink_metadata so a link to a directory is unlinked, not
        // followed into a recursive delete of its target.
        let metadata = fs::symlink_metadata(&target).await?;
        if metadata.is_dir() {
            fs::remove_dir_all(&target).await?;
        } else {
            fs::remove_file(&target).await?;
        }
        Ok(())
    }
}

fn copy_recursively(source: &Path, dest: &Path) -> io::Result<()> {
    if source.is_dir() {
        std::fs::create_dir(dest)?;
        for entry in std::fs::read_dir(source)? {
            let entry = entry?;
            copy_recursively(&entry.path(), &dest.join(entry.file_name()))?;
        }
    } else {
        std::fs::copy(source, dest)?;
    }
    Ok(())
}

/// Client-visible path of `name` inside the directory `source`.
fn client_path(source: &str, name: &str) -> String {
    let base = source.trim_matches('/');
    if base.is_empty() {
        format!("/{}", name)
    } else {
        format!("/{}/{}", base, name)
    }
}

fn epoch_millis(time: io::Result<SystemTime>) -> u64 {
    time.ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_storage() -> (TempDir, Storage) {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(PathResolver::new(temp.path().to_path_buf()));
        (temp, storage)
    }

    #[test]
    fn client_path_joins_onto_the_source() {
        assert_eq!(client_path("/", "a.txt"), "/a.txt");
        assert_eq!(client_path("", "a.txt"), "/a.txt");
        assert_eq!(client_path("/docs", "a.txt"), "/docs/a.txt");
        assert_eq!(client_path("docs/sub/", "a.txt"), "/docs/sub/a.txt");
    }

    #[tokio::test]
    async fn list_reports_entry_metadata() {
        let (temp, storage) = make_storage();
        std::fs::write(temp.path().join("hello.txt"), b"hi").unwrap();
        std::fs::create_dir(temp.path().join("docs")).unwrap();

        let mut files = storage.list("/").await.unwrap();
        files.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(files.len(), 2);

        let dir = &files[0];
        assert_eq!(dir.name, "docs");
        assert_eq!(dir.path, "/docs");
        assert!(!dir.is_file);
        assert_eq!(dir.mime_type, None);

        let file = &files[1];
        assert_eq!(file.name, "hello.txt");
        assert_eq!(file.path, "/hello.txt");
        assert_eq!(file.size, 2);
        assert!(file.is_file);
        assert_eq!(file.mime_type, Some("text/plain"));
        assert!(file.modify_time > 0);
    }

    #[tokio::test]
    async fn listing_an_unchanged_directory_is_stable() {
        let (temp, storage) = make_storage();
        std::fs::write(temp.path().join("a.txt"), b"aa").unwrap();
        std::fs::write(temp.path().join("b.txt"), b"bbb").unwrap();

        let mut first = storage.list("/").await.unwrap();
        let mut second = storage.list("/").await.unwrap();
        // Iteration order is whatever the filesystem hands back, so
        // compare as sets.
        first.sort_by(|a, b| a.name.cmp(&b.name));
        second.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.path, b.path);
            assert_eq!(a.size, b.size);
            assert_eq!(a.is_file, b.is_file);
        }
    }

    #[tokio::test]
    async fn list_of_empty_directory_is_empty() {
        let (_temp, storage) = make_storage();
        assert!(storage.list("/").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_missing_source_is_not_found() {
        let (_temp, storage) = make_storage();
        assert!(matches!(
            storage.list("/absent").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_on_file_is_not_a_directory() {
        let (temp, storage) = make_storage();
        std::fs::write(temp.path().join("plain.txt"), b"x").unwrap();
        assert!(matches!(
            storage.list("/plain.txt").await,
            Err(AppError::NotADirectory(_))
        ));
    }

    #[tokio::test]
    async fn list_rejects_traversal_before_touching_the_filesystem() {
        let (_temp, storage) = make_storage();
        // The escaped path does not exist either; containment wins.
        assert!(matches!(
            storage.list("../outside").await,
            Err(AppError::PermissionDenied(_))
        ));
    }

    #[tokio::test]
    async fn create_makes_directories_and_files() {
        let (temp, storage) = make_storage();

        storage.create("/", "docs", None, false).await.unwrap();
        assert!(temp.path().join("docs").is_dir());

        storage
            .create("/docs", "note.txt", Some(b"hello"), false)
            .await
            .unwrap();
        assert_eq!(
            std::fs::read(temp.path().join("docs/note.txt")).unwrap(),
            b"hello"
        );
    }

    #[tokio::test]
    async fn create_without_overwrite_preserves_existing_content() {
        let (temp, storage) = make_storage();
        storage
            .create("/", "a.txt", Some(b"one"), false)
            .await
            .unwrap();

        let result = storage.create("/", "a.txt", Some(b"two"), false).await;
        assert!(matches!(result, Err(AppError::AlreadyExists(_))));
        assert_eq!(std::fs::read(temp.path().join("a.txt")).unwrap(), b"one");
    }

    #[tokio::test]
    async fn create_with_overwrite_replaces_content() {
        let (temp, storage) = make_storage();
        storage
            .create("/", "a.txt", Some(b"one"), false)
            .await
            .unwrap();

        storage
            .create("/", "a.txt", Some(b"two"), true)
            .await
            .unwrap();
        assert_eq!(std::fs::read(temp.path().join("a.txt")).unwrap(), b"two");
    }

    #[tokio::test]
    async fn create_with_overwrite_defers_to_the_filesystem() {
        let (temp, storage) = make_storage();
        storage.create("/", "d", None, false).await.unwrap();

        // Writing file content over a directory is refused by the OS
        // (EISDIR), which is outside the named kinds.
        assert!(matches!(
            storage.create("/", "d", Some(b"x"), true).await,
            Err(AppError::Filesystem(_))
        ));
        // mkdir over an existing entry fails with EEXIST even when
        // overwrite was requested.
        assert!(matches!(
            storage.create("/", "d", None, true).await,
            Err(AppError::AlreadyExists(_))
        ));
        assert!(temp.path().join("d").is_dir());
    }

    #[tokio::test]
    async fn create_uses_only_the_final_name_component() {
        let (temp, storage) = make_storage();
        storage
            .create("/", "nested/inner.txt", Some(b"x"), false)
            .await
            .unwrap();

        assert!(temp.path().join("inner.txt").is_file());
        assert!(!temp.path().join("nested").exists());
    }

    #[tokio::test]
    async fn create_rejects_names_without_a_component() {
        let (_temp, storage) = make_storage();
        assert!(matches!(
            storage.create("/", "..", None, false).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            storage.create("/", "a/..", Some(b"x"), false).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn create_into_missing_directory_is_not_found() {
        let (_temp, storage) = make_storage();
        assert!(matches!(
            storage.create("/absent", "f.txt", Some(b"x"), false).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn move_renames_across_directories() {
        let (temp, storage) = make_storage();
        std::fs::create_dir(temp.path().join("a")).unwrap();
        std::fs::create_dir(temp.path().join("b")).unwrap();
        std::fs::write(temp.path().join("a/f.txt"), b"payload").unwrap();

        storage.rename("/a/f.txt", "/b/g.txt").await.unwrap();

        assert!(!temp.path().join("a/f.txt").exists());
        assert_eq!(std::fs::read(temp.path().join("b/g.txt")).unwrap(), b"payload");
    }

    #[tokio::test]
    async fn move_missing_source_is_not_found() {
        let (_temp, storage) = make_storage();
        // The existence check and the rename are two syscalls; a
        // concurrent change in between surfaces as the rename's own
        // filesystem error instead.
        assert!(matches!(
            storage.rename("/absent", "/b").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn move_rejects_escaping_destination() {
        let (temp, storage) = make_storage();
        std::fs::write(temp.path().join("f.txt"), b"x").unwrap();

        assert!(matches!(
            storage.rename("/f.txt", "../../f.txt").await,
            Err(AppError::PermissionDenied(_))
        ));
        assert!(temp.path().join("f.txt").exists());
    }

    #[tokio::test]
    async fn copy_reproduces_a_directory_tree() {
        let (temp, storage) = make_storage();
        std::fs::create_dir_all(temp.path().join("a/sub")).unwrap();
        std::fs::write(temp.path().join("a/top.txt"), b"top").unwrap();
        std::fs::write(temp.path().join("a/sub/deep.txt"), b"deep").unwrap();

        storage.copy("/a", "/b").await.unwrap();

        assert_eq!(std::fs::read(temp.path().join("b/top.txt")).unwrap(), b"top");
        assert_eq!(
            std::fs::read(temp.path().join("b/sub/deep.txt")).unwrap(),
            b"deep"
        );
        // The source tree is left in place.
        assert!(temp.path().join("a/sub/deep.txt").exists());
    }

    #[tokio::test]
    async fn copy_missing_source_is_not_found() {
        let (_temp, storage) = make_storage();
        assert!(matches!(
            storage.copy("/absent", "/b").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn copy_over_existing_destination_is_rejected() {
        let (temp, storage) = make_storage();
        std::fs::write(temp.path().join("src.txt"), b"new").unwrap();
        std::fs::write(temp.path().join("dst.txt"), b"old").unwrap();

        assert!(matches!(
            storage.copy("/src.txt", "/dst.txt").await,
            Err(AppError::AlreadyExists(_))
        ));
        assert_eq!(std::fs::read(temp.path().join("dst.txt")).unwrap(), b"old");
    }

    #[tokio::test]
    async fn delete_removes_files_and_trees() {
        let (temp, storage) = make_storage();
        std::fs::write(temp.path().join("f.txt"), b"x").unwrap();
        std::fs::create_dir_all(temp.path().join("d/sub")).unwrap();
        std::fs::write(temp.path().join("d/sub/g.txt"), b"y").unwrap();

        storage.remove("/f.txt").await.unwrap();
        assert!(!temp.path().join("f.txt").exists());

        storage.remove("/d").await.unwrap();
        assert!(!temp.path().join("d").exists());
    }

    #[tokio::test]
    async fn delete_missing_target_is_not_found() {
        let (_temp, storage) = make_storage();
        assert!(matches!(
            storage.remove("/absent").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn delete_unlinks_a_symlink_without_following_it() {
        let (temp, storage) = make_storage();
        std::fs::create_dir(temp.path().join("real")).unwrap();
        std::fs::write(temp.path().join("real/keep.txt"), b"x").unwrap();
        std::os::unix::fs::symlink(temp.path().join("real"), temp.path().join("link")).unwrap();

        storage.remove("/link").await.unwrap();

        assert!(!temp.path().join("link").exists());
        assert!(temp.path().join("real/keep.txt").exists());
    }

    #[tokio::test]
    async fn end_to_end_scenario() {
        let (temp, storage) = make_storage();

        storage.create("/", "a", None, false).await.unwrap();
        storage
            .create("/a", "hello.txt", Some(b"hi"), false)
            .await
            .unwrap();

        let files = storage.list("/a").await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "hello.txt");
        assert_eq!(files[0].path, "/a/hello.txt");
        assert_eq!(files[0].size, 2);
        assert!(files[0].is_file);
        assert_eq!(files[0].mime_type, Some("text/plain"));

        storage.copy("/a", "/b").await.unwrap();
        storage.remove("/a").await.unwrap();

        assert!(matches!(
            storage.list("/a").await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(std::fs::read(temp.path().join("b/hello.txt")).unwrap(), b"hi");
    }
}
