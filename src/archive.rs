//! Executable extraction from the node binary archive
//!
//! The archive is downloaded into memory, decompressed when it starts with
//! the gzip magic bytes, and read as a tar stream. Only regular (or
//! contiguous) files with the owner-executable bit are extracted, flattened
//! into the destination directory. Anything already written stays on disk if
//! a later entry fails.
//!
//! Entry bodies are copied by hand so that a stream ending inside an entry is
//! reported as a malformed archive and not as a failed local write.

use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use reqwest::blocking::Client;
use tar::{Archive, EntryType};

use crate::config::writer::ensure_private_dir;
use crate::error::fs as fs_error;
use crate::error::{Result, archive, release};
use crate::http;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const OWNER_EXECUTABLE: u32 = 0o100;
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Download the archive at `archive_url` and extract its executables into `dest_dir`
pub fn extract_executables(client: &Client, archive_url: &str, dest_dir: &Path) -> Result<Vec<PathBuf>> {
    tracing::info!("Extracting files from {}", archive_url);

    let mut buffer = Vec::new();
    http::get(client, archive_url)?
        .copy_to(&mut buffer)
        .map_err(|e| release::network(archive_url, e))?;

    ensure_private_dir(dest_dir)?;

    if buffer.starts_with(&GZIP_MAGIC) {
        unpack_executables(GzDecoder::new(Cursor::new(buffer)), archive_url, dest_dir)
    } else {
        unpack_executables(Cursor::new(buffer), archive_url, dest_dir)
    }
}

/// Extract owner-executable regular files from a tar stream into `dest_dir`
pub fn unpack_executables<R: Read>(reader: R, source: &str, dest_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut tar = Archive::new(reader);
    let mut extracted = Vec::new();

    let entries = tar.entries().map_err(|e| archive::format(source, e))?;
    for entry in entries {
        let mut entry = entry.map_err(|e| archive::format(source, e))?;

        let header = entry.header();
        let entry_type = header.entry_type();
        if !(entry_type.is_file() || entry_type == EntryType::Continuous) {
            continue;
        }
        let mode = header.mode().map_err(|e| archive::format(source, e))?;
        if mode & OWNER_EXECUTABLE == 0 {
            continue;
        }

        let entry_path = entry.path().map_err(|e| archive::format(source, e))?;
        let Some(file_name) = entry_path.file_name().map(ToOwned::to_owned) else {
            tracing::debug!("Skipping entry without a file name: {}", entry_path.display());
            continue;
        };

        let target = dest_dir.join(file_name);
        tracing::info!("Extracting {}", target.display());
        let size = entry.size();
        copy_entry(&mut entry, size, source, &target, mode)?;
        extracted.push(target);
    }

    Ok(extracted)
}

/// Write one entry body of `size` bytes to `target` with the entry's permission bits.
///
/// The tar reader ends an entry quietly at end of stream, so a short body is
/// detected by counting.
fn copy_entry<R: Read>(
    entry: &mut R,
    size: u64,
    source: &str,
    target: &Path,
    mode: u32,
) -> Result<()> {
    let mut file = File::create(target).map_err(|e| fs_error::write_failed(target, e))?;

    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut copied: u64 = 0;
    loop {
        let read = entry
            .read(&mut buffer)
            .map_err(|e| archive::format(source, format!("{}: {e}", target.display())))?;
        if read == 0 {
            break;
        }
        copied += read as u64;
        file.write_all(&buffer[..read])
            .map_err(|e| fs_error::write_failed(target, e))?;
    }
    file.flush().map_err(|e| fs_error::write_failed(target, e))?;

    if copied != size {
        return Err(archive::format(
            source,
            format!(
                "archive ends inside {}: expected {size} bytes, got {copied}",
                target.display()
            ),
        ));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(target, std::fs::Permissions::from_mode(mode & 0o7777))
            .map_err(|e| fs_error::write_failed(target, e))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    Ok(())
}
