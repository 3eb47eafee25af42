//! Bundles the documents of one request into a single zip archive.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{error, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{GuideError, Result};

/// Writes `output_dir/archive_name` containing every file of `files`, in order, under
/// its base name. An existing archive of the same name is replaced. An empty `files`
/// yields a valid, empty archive.
///
/// The archive is built in a temporary file inside `output_dir` and moved onto
/// `archive_name` only once it is complete; on error any previous archive is left
/// untouched.
pub fn assemble(files: &[PathBuf], output_dir: &Path, archive_name: &str) -> Result<PathBuf> {
    let archive_path = output_dir.join(archive_name);
    fs::create_dir_all(output_dir).map_err(|e| {
        error!(error = ?e, path = %output_dir.display(), "[ARCHIVE] Failed to create output directory");
        GuideError::archive(&archive_path, e)
    })?;

    let staging = NamedTempFile::new_in(output_dir).map_err(|e| {
        error!(error = ?e, path = %output_dir.display(), "[ARCHIVE] Failed to create staging file");
        GuideError::archive(&archive_path, e)
    })?;
    let mut zip = ZipWriter::new(staging);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut seen: HashSet<&str> = HashSet::new();

    for path in files {
        let entry_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                GuideError::archive(
                    &archive_path,
                    format!("{} has no usable file name", path.display()),
                )
            })?;
        if !seen.insert(entry_name) {
            return Err(GuideError::archive(
                &archive_path,
                format!("duplicate entry name {entry_name}"),
            ));
        }

        let mut source = File::open(path).map_err(|e| {
            error!(error = ?e, path = %path.display(), "[ARCHIVE] Failed to open document");
            GuideError::archive(&archive_path, format!("{}: {e}", path.display()))
        })?;
        zip.start_file(entry_name, options).map_err(|e| {
            error!(error = ?e, entry = entry_name, "[ARCHIVE] Failed to start archive entry");
            GuideError::archive(&archive_path, format!("{entry_name}: {e}"))
        })?;
        io::copy(&mut source, &mut zip)
            .map_err(|e| GuideError::archive(&archive_path, format!("{entry_name}: {e}")))?;
    }

    let staging = zip
        .finish()
        .map_err(|e| GuideError::archive(&archive_path, e))?;
    staging.persist(&archive_path).map_err(|e| {
        error!(error = ?e.error, path = %archive_path.display(), "[ARCHIVE] Failed to move archive into place");
        GuideError::archive(&archive_path, e.error)
    })?;
    info!(path = %archive_path.display(), entries = files.len(), "[ARCHIVE] Archive assembled");
    Ok(archive_path)
}
