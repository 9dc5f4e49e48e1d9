use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::types::InspectError;

pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// SHA-256 over one file's bytes, recomputed from disk on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDigest {
    pub path: PathBuf,
    pub sha256: String,
    pub size: u64,
}

pub fn sha256_file(path: &Path) -> Result<FileDigest, InspectError> {
    sha256_file_chunked(path, DEFAULT_CHUNK_SIZE)
}

/// Streams the file through the hasher in fixed-size chunks. The chunk size
/// bounds memory use and never changes the digest.
pub fn sha256_file_chunked(path: &Path, chunk_size: usize) -> Result<FileDigest, InspectError> {
    let mut file = File::open(path).map_err(|err| InspectError::io(path, err))?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; chunk_size.max(1)];
    let mut size = 0u64;
    loop {
        let read = file
            .read(&mut buffer)
            .map_err(|err| InspectError::io(path, err))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
        size += read as u64;
    }

    Ok(FileDigest {
        path: path.to_path_buf(),
        sha256: hex_string(&hasher.finalize()),
        size,
    })
}

fn hex_string(digest: &[u8]) -> String {
    use std::fmt::Write;
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
