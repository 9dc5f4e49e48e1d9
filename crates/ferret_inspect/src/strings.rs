use std::ops::RangeInclusive;
use std::path::Path;

use ferret_logging::ferret_debug;
use serde::Serialize;

/// One maximal run of printable ASCII found in a byte buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringRun {
    pub value: String,
    pub byte_offset: usize,
}

const PRINTABLE: RangeInclusive<u8> = 0x20..=0x7E;

/// Single forward pass: collect maximal printable-ASCII runs of at least
/// `min_len` bytes, in buffer order, stopping the scan outright once
/// `max_results` runs have been emitted. A qualifying run that touches the
/// end of the buffer is emitted as the final result.
pub fn extract_strings(bytes: &[u8], min_len: usize, max_results: usize) -> Vec<StringRun> {
    let min_len = min_len.max(1);
    let max_results = max_results.max(1);

    let mut results = Vec::new();
    let mut run_start = 0usize;
    let mut run: Vec<u8> = Vec::new();
    for (index, &byte) in bytes.iter().enumerate() {
        if PRINTABLE.contains(&byte) {
            if run.is_empty() {
                run_start = index;
            }
            run.push(byte);
        } else {
            if run.len() >= min_len {
                results.push(to_run(&run, run_start));
                if results.len() >= max_results {
                    return results;
                }
            }
            run.clear();
        }
    }
    if run.len() >= min_len {
        results.push(to_run(&run, run_start));
    }
    results
}

/// Best-effort file variant: any read failure yields an empty result.
pub fn extract_strings_from_file(
    path: &Path,
    min_len: usize,
    max_results: usize,
) -> Vec<StringRun> {
    match std::fs::read(path) {
        Ok(bytes) => extract_strings(&bytes, min_len, max_results),
        Err(err) => {
            ferret_debug!("strings extraction skipped for {}: {}", path.display(), err);
            Vec::new()
        }
    }
}

fn to_run(bytes: &[u8], byte_offset: usize) -> StringRun {
    StringRun {
        value: bytes.iter().map(|&byte| byte as char).collect(),
        byte_offset,
    }
}
