//! Ferret inspect: local process metadata and binary examination.
mod digest;
mod process;
mod source;
mod strings;
mod types;

pub use digest::{sha256_file, sha256_file_chunked, FileDigest, DEFAULT_CHUNK_SIZE};
pub use process::{
    inspect_process, process_inspection_available, CpuSample, MemorySample, ProcessReport,
};
pub use source::{source_for_path, source_for_pid, FileMeta, SourceOptions, SourceReport};
pub use strings::{extract_strings, extract_strings_from_file, StringRun};
pub use types::InspectError;
