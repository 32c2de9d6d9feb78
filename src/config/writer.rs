//! Read-modify-write of configuration documents on disk
//!
//! Every write goes through the same steps:
//! - the parent directory is created owner-only (`0700`), tolerating existing
//!   directories
//! - the file is opened, or created if it does not exist yet
//! - an existing file is parsed; a malformed file aborts before anything is
//!   written, so user config is never silently discarded
//! - the document is updated in memory, then the file is truncated and
//!   rewritten
//!
//! There is no locking: callers writing the same path must serialize.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

use super::ConfigDocument;
use crate::error::fs as fs_error;
use crate::error::Result;

/// Result of opening a config file for read-modify-write
#[derive(Debug)]
pub enum OpenedFile {
    /// The file did not exist and was created empty
    Created(File),
    /// The file already existed
    Existing(File),
}

/// Create `dir` and any missing ancestors with owner-only permissions
pub fn ensure_private_dir(dir: &Path) -> Result<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder
        .create(dir)
        .map_err(|e| fs_error::write_failed(dir, e))
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_private_dir(parent),
        _ => Ok(()),
    }
}

/// Open `path` read-write, creating it if it does not exist
pub fn open_or_create(path: &Path) -> Result<OpenedFile> {
    let created = OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(path);

    match created {
        Ok(file) => Ok(OpenedFile::Created(file)),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map(OpenedFile::Existing)
            .map_err(|e| fs_error::read_failed(path, e)),
        Err(e) => Err(fs_error::write_failed(path, e)),
    }
}

/// Load the document at `path`, apply `update`, and rewrite the file.
///
/// Returns the document as written.
pub fn update_document<F>(path: &Path, update: F) -> Result<ConfigDocument>
where
    F: FnOnce(&mut ConfigDocument) -> Result<()>,
{
    ensure_parent_dir(path)?;

    let (mut file, mut document) = match open_or_create(path)? {
        OpenedFile::Created(file) => (file, ConfigDocument::new()),
        OpenedFile::Existing(mut file) => {
            let mut content = String::new();
            file.read_to_string(&mut content)
                .map_err(|e| fs_error::read_failed(path, e))?;
            let document = ConfigDocument::from_yaml(&content, &path.display().to_string())?;
            (file, document)
        }
    };

    update(&mut document)?;

    let rendered = document.to_yaml()?;
    rewrite(&mut file, &rendered).map_err(|e| fs_error::write_failed(path, e))?;
    Ok(document)
}

fn rewrite(file: &mut File, content: &str) -> std::io::Result<()> {
    file.seek(SeekFrom::Start(0))?;
    file.set_len(0)?;
    file.write_all(content.as_bytes())?;
    file.flush()
}

/// Shallow-merge `fields` into the document at `path`
pub fn merge_write(path: &Path, fields: ConfigDocument) -> Result<ConfigDocument> {
    tracing::info!("Writing config to {}", path.display());
    update_document(path, |document| {
        document.merge_shallow(fields);
        Ok(())
    })
}

/// Shallow-merge `fields` into the mapping under `key` of the document at `path`
pub fn merge_write_nested(path: &Path, key: &str, fields: ConfigDocument) -> Result<ConfigDocument> {
    update_document(path, |document| document.merge_nested(key, fields))
}

/// Overwrite `path` with `value` rendered as YAML
pub fn write_document<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let rendered = serde_yaml::to_string(value)?;
    std::fs::write(path, rendered).map_err(|e| fs_error::write_failed(path, e))
}
