use crate::domain::ports::{FileSystem, WalkControl, WalkEntry};
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// [`FileSystem`] backed by the local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    async fn stat(&self, path: &Path) -> io::Result<bool> {
        let metadata = tokio::fs::metadata(path).await?;
        Ok(metadata.is_dir())
    }

    async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }

    // Symlinks are reported, not followed. Children are visited in name order.
    fn walk(
        &self,
        root: &Path,
        visit: &mut dyn FnMut(WalkEntry) -> io::Result<WalkControl>,
    ) -> io::Result<()> {
        let mut entries = WalkDir::new(root).sort_by_file_name().into_iter();

        while let Some(next) = entries.next() {
            let entry = match next {
                Ok(entry) => WalkEntry {
                    path: entry.path().to_path_buf(),
                    is_dir: entry.file_type().is_dir(),
                    error: None,
                },
                Err(err) => WalkEntry {
                    path: err.path().unwrap_or(root).to_path_buf(),
                    is_dir: false,
                    error: Some(io::Error::from(err)),
                },
            };

            let is_dir = entry.is_dir;
            if visit(entry)? == WalkControl::SkipSubtree && is_dir {
                entries.skip_current_dir();
            }
        }
        Ok(())
    }
}
