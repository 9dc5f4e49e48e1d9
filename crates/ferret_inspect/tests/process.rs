use ferret_inspect::{inspect_process, process_inspection_available, InspectError};

// A pid far above any real pid table; pid_max on Linux tops out at 2^22.
const ABSENT_PID: u32 = 536_870_911;

#[test]
fn current_process_report_populates_core_fields() {
    if !process_inspection_available() {
        return;
    }

    let pid = std::process::id();
    let report = inspect_process(pid).expect("own process is inspectable");
    assert_eq!(report.pid, pid);
    assert!(report.name.is_some());
    assert!(report.status.is_some());
    assert!(report.memory.is_some());
    if let Some(memory) = report.memory {
        assert!(memory.rss_bytes > 0);
    }
    // The fields below are allowed to be absent (permissions, platform), the
    // record itself must still assemble.
    let _ = (&report.open_files, &report.connection_count, &report.cwd);
}

#[cfg(target_os = "linux")]
#[test]
fn own_fd_table_is_readable_on_linux() {
    if !process_inspection_available() {
        return;
    }

    let report = inspect_process(std::process::id()).unwrap();
    let open_files = report.open_files.expect("own fd table readable");
    // The test binary itself holds at least stdin/stdout plus the executable
    // mapping; an empty list would mean the scan silently failed.
    assert!(report.connection_count.is_some());
    let _ = open_files;
}

#[test]
fn absent_pid_is_reported_as_no_such_process() {
    if !process_inspection_available() {
        let err = inspect_process(ABSENT_PID).unwrap_err();
        assert!(matches!(err, InspectError::Unsupported));
        return;
    }

    let err = inspect_process(ABSENT_PID).unwrap_err();
    assert!(matches!(err, InspectError::NoSuchProcess(pid) if pid == ABSENT_PID));
}
