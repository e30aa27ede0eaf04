use crate::domain::ports::{FileSystem, WalkControl};
use crate::utils::error::{ImportError, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Directory,
}

/// Classifies `path` as a file or a directory.
pub async fn classify<F: FileSystem>(fs: &F, path: &Path) -> Result<PathKind> {
    let is_dir = fs.stat(path).await.map_err(|source| ImportError::PathAccess {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(if is_dir {
        PathKind::Directory
    } else {
        PathKind::File
    })
}

/// Derives the target collection from a file path by dropping the final
/// extension of its base name: `/data/order.items.json` -> `order.items`.
///
/// The extension starts at the last `.` even when that is the first
/// character, so a file named `.json` maps to an empty collection name.
pub fn collection_name(path: &Path) -> String {
    let name = base_name(path);
    match name.rfind('.') {
        Some(dot) => name[..dot].to_string(),
        None => name,
    }
}

pub fn has_json_extension(path: &Path) -> bool {
    let name = base_name(path);
    name.rfind('.')
        .is_some_and(|dot| name[dot + 1..].eq_ignore_ascii_case("json"))
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Recursively collects every file under `dir` with a `.json` extension, in
/// walk order. Any walk error aborts discovery.
pub fn discover_json_files<F: FileSystem>(fs: &F, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    fs.walk(dir, &mut |entry| {
        if let Some(err) = entry.error {
            return Err(err);
        }
        if !entry.is_dir && has_json_extension(&entry.path) {
            files.push(entry.path);
        }
        Ok(WalkControl::Continue)
    })
    .map_err(|source| ImportError::DirectoryWalk {
        path: dir.to_path_buf(),
        source,
    })?;

    tracing::debug!("Discovered {} JSON files under {}", files.len(), dir.display());
    Ok(files)
}
