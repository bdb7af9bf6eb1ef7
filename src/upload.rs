// Dataset upload. The transfer itself is done by a `DatasetClient`; this
// module picks the real or the validation-only path and gathers the local
// files a client sends.

use std::path::{Path, PathBuf};

use log::{debug, info};
use serde_json::Value;
use walkdir::WalkDir;

#[cfg(test)]
use mockall::automock;

use crate::error::{CloudLabelError, Result};

/// Dataset endpoints of a project.
#[cfg_attr(test, automock)]
pub trait DatasetClient {
    /// Upload `path` and persist it server-side.
    fn upload_dir(&self, path: &Path, create_tags: bool) -> Result<Value>;

    /// Validate `path` against the project without persisting anything.
    fn test_zip(&self, path: &Path, create_tags: bool) -> Result<Value>;
}

/// Options shared by the `upload` and `upload_dir` commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadOptions {
    pub create_tags: bool,
    pub dry_run: bool,
}

/// Send `path` through `client` and return the service response unchanged.
pub fn upload<C: DatasetClient + ?Sized>(
    client: &C,
    path: &Path,
    options: UploadOptions,
) -> Result<Value> {
    if options.dry_run {
        info!("Dry run: validating {}", path.display());
        client.test_zip(path, options.create_tags)
    } else {
        info!("Uploading {}", path.display());
        client.upload_dir(path, options.create_tags)
    }
}

/// A local file queued for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Name sent to the service: path relative to the upload root, `/`-separated.
    pub name: String,
    pub path: PathBuf,
}

/// Files to send for `path`. A plain file is sent alone under its own name;
/// a directory is walked recursively, keeping regular files only, sorted by
/// relative name.
pub fn collect_files(path: &Path) -> Result<Vec<UploadFile>> {
    let metadata = path.metadata().map_err(|e| CloudLabelError::io(path, e))?;
    if metadata.is_file() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        return Ok(vec![UploadFile {
            name,
            path: path.to_path_buf(),
        }]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path) {
        let entry = entry.map_err(|e| {
            let at = e.path().unwrap_or(path).to_path_buf();
            CloudLabelError::io(at, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(path).unwrap_or(entry.path());
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push(UploadFile {
            name,
            path: entry.path().to_path_buf(),
        });
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));
    debug!("Collected {} files under {}", files.len(), path.display());
    Ok(files)
}
