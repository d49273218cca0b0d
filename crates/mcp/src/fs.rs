//! Filesystem adapter

use osmos_common::{Error, Result};
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// List the immediate children of `dir`, sorted by name
pub async fn list_dir(dir: &Path) -> Result<Vec<DirEntryInfo>> {
    let mut reader = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| Error::at_path(dir, e))?;

    let mut entries = Vec::new();
    while let Some(entry) = reader
        .next_entry()
        .await
        .map_err(|e| Error::at_path(dir, e))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| Error::at_path(entry.path(), e))?;
        entries.push(DirEntryInfo {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path(),
            is_dir: file_type.is_dir(),
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Recursively collect every non-directory entry under `dir`.
///
/// Traversal is depth-first with siblings in name order; returned paths are
/// relative to `root` and use `/` separators. Symbolic links are listed but
/// never followed.
pub async fn walk_files(root: &Path, dir: &Path) -> Result<Vec<String>> {
    let root = root.to_path_buf();
    let dir = dir.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<Vec<String>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&dir).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.clone());
                Error::at_path(path, e.into())
            })?;
            if !entry.file_type().is_dir() {
                files.push(relative_display(&root, entry.path()));
            }
        }
        Ok(files)
    })
    .await
    .map_err(|e| Error::Internal(format!("directory walk panicked: {}", e)))?
}

pub async fn read_to_string(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::at_path(path, e))
}

pub async fn modified(path: &Path) -> Result<SystemTime> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| Error::at_path(path, e))?;
    metadata.modified().map_err(|e| Error::at_path(path, e))
}

/// `path` relative to `root`, joined with `/`
pub fn relative_display(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Join a caller-supplied relative folder onto `base`, refusing anything that
/// could leave `base`.
pub fn scoped_dir(base: &Path, folder: Option<&str>) -> Result<PathBuf> {
    let folder = match folder.map(str::trim) {
        None | Some("") => return Ok(base.to_path_buf()),
        Some(folder) => folder,
    };

    let escapes = Path::new(folder).components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(Error::InvalidArguments(format!(
            "folder '{}' must be a path inside {}",
            folder,
            base.display()
        )));
    }

    Ok(base.join(folder))
}
