use std::path::Path;

use ferret_inspect::{extract_strings, extract_strings_from_file, StringRun};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn values(runs: &[StringRun]) -> Vec<&str> {
    runs.iter().map(|run| run.value.as_str()).collect()
}

#[test]
fn runs_shorter_than_min_len_are_discarded() {
    let runs = extract_strings(b"AB\x00CDEF\x01", 2, 100);
    assert_eq!(values(&runs), vec!["AB", "CDEF"]);
    assert_eq!(runs[0].byte_offset, 0);
    assert_eq!(runs[1].byte_offset, 3);

    assert_eq!(extract_strings(b"AB\x00CDEF\x01", 5, 100), Vec::new());
}

#[test]
fn empty_buffer_yields_nothing() {
    assert_eq!(extract_strings(b"", 1, 100), Vec::new());
}

#[test]
fn buffer_of_only_unprintable_bytes_yields_nothing() {
    assert_eq!(extract_strings(b"\x00\x01\x7f\xff\x1f", 1, 100), Vec::new());
}

#[test]
fn printable_range_boundaries_are_inclusive() {
    // 0x20 (space) and 0x7e (~) are in; 0x1f and 0x7f are out.
    let runs = extract_strings(b"\x1f ~\x7f", 2, 100);
    assert_eq!(values(&runs), vec![" ~"]);
    assert_eq!(runs[0].byte_offset, 1);
}

#[test]
fn trailing_run_is_emitted_when_buffer_ends_mid_run() {
    let runs = extract_strings(b"\x00tail", 3, 100);
    assert_eq!(values(&runs), vec!["tail"]);
    assert_eq!(runs[0].byte_offset, 1);
}

#[test]
fn result_cap_stops_the_scan_in_order() {
    let buffer = b"one\x00two\x00three\x00four";
    let runs = extract_strings(buffer, 3, 2);
    assert_eq!(values(&runs), vec!["one", "two"]);

    // Cap reached mid-buffer suppresses the trailing run too.
    let capped = extract_strings(b"AAA\x00BB\x00tail", 2, 1);
    assert_eq!(values(&capped), vec!["AAA"]);
}

#[test]
fn whole_printable_buffer_is_one_run() {
    let runs = extract_strings(b"all printable", 4, 10);
    assert_eq!(values(&runs), vec!["all printable"]);
    assert_eq!(runs[0].byte_offset, 0);
}

#[test]
fn file_variant_reads_from_disk() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("blob.bin");
    std::fs::write(&path, b"\x00\x01hello\x02world").unwrap();

    let runs = extract_strings_from_file(&path, 4, 100);
    assert_eq!(values(&runs), vec!["hello", "world"]);
}

#[test]
fn unreadable_file_downgrades_to_empty() {
    let runs = extract_strings_from_file(Path::new("/definitely/not/here.bin"), 4, 100);
    assert_eq!(runs, Vec::new());
}
