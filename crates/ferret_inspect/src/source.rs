use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::digest::sha256_file;
use crate::process::executable_path;
use crate::strings::{extract_strings_from_file, StringRun};
use crate::types::InspectError;

#[derive(Debug, Clone, Serialize)]
pub struct FileMeta {
    pub path: PathBuf,
    pub size: u64,
    pub modified_epoch_secs: Option<u64>,
    pub readonly: bool,
}

/// Combined report over one on-disk binary: metadata, content hash, and a
/// short printable-strings sample.
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub source_path: PathBuf,
    pub file: FileMeta,
    pub sha256: Option<String>,
    pub strings: Vec<StringRun>,
}

#[derive(Debug, Clone)]
pub struct SourceOptions {
    pub strings_min_len: usize,
    pub strings_limit: usize,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            strings_min_len: 4,
            strings_limit: 200,
        }
    }
}

/// Resolve a pid to its executable image and report on that file.
pub fn source_for_pid(pid: u32, options: &SourceOptions) -> Result<SourceReport, InspectError> {
    let path = executable_path(pid)?;
    source_for_path(&path, options)
}

/// File metadata must be readable; the digest and strings fields are
/// best-effort and degrade to absent/empty on failure.
pub fn source_for_path(path: &Path, options: &SourceOptions) -> Result<SourceReport, InspectError> {
    let metadata = std::fs::metadata(path).map_err(|err| InspectError::io(path, err))?;
    let modified_epoch_secs = metadata
        .modified()
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .map(|age| age.as_secs());
    let file = FileMeta {
        path: path.to_path_buf(),
        size: metadata.len(),
        modified_epoch_secs,
        readonly: metadata.permissions().readonly(),
    };

    let sha256 = sha256_file(path).ok().map(|digest| digest.sha256);
    let strings = extract_strings_from_file(path, options.strings_min_len, options.strings_limit);

    Ok(SourceReport {
        source_path: path.to_path_buf(),
        file,
        sha256,
        strings,
    })
}
