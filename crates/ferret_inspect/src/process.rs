use std::path::{Path, PathBuf};

use serde::Serialize;
use sysinfo::{Pid, ProcessesToUpdate, System, Users};

use crate::types::InspectError;

/// Best-effort process metadata. Every field is independently optional: a
/// failed lookup leaves that one field absent instead of failing the record.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessReport {
    pub pid: u32,
    pub name: Option<String>,
    pub cmdline: Option<Vec<String>>,
    pub exe: Option<PathBuf>,
    pub cwd: Option<PathBuf>,
    pub username: Option<String>,
    pub started_at_epoch_secs: Option<u64>,
    pub status: Option<String>,
    pub cpu: Option<CpuSample>,
    pub memory: Option<MemorySample>,
    pub open_files: Option<Vec<PathBuf>>,
    pub connection_count: Option<usize>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CpuSample {
    pub usage_percent: f32,
    pub run_seconds: u64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MemorySample {
    pub rss_bytes: u64,
    pub virtual_bytes: u64,
}

/// Capability check, performed once per call site rather than per field.
pub fn process_inspection_available() -> bool {
    sysinfo::IS_SUPPORTED_SYSTEM
}

pub fn inspect_process(pid: u32) -> Result<ProcessReport, InspectError> {
    if !process_inspection_available() {
        return Err(InspectError::Unsupported);
    }

    let target = Pid::from_u32(pid);
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[target]), true);
    let process = system
        .process(target)
        .ok_or(InspectError::NoSuchProcess(pid))?;

    let name = Some(process.name().to_string_lossy().into_owned()).filter(|name| !name.is_empty());
    let cmdline = Some(
        process
            .cmd()
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect::<Vec<_>>(),
    )
    .filter(|args| !args.is_empty());
    let username = process.user_id().and_then(|uid| {
        let users = Users::new_with_refreshed_list();
        users
            .get_user_by_id(uid)
            .map(|user| user.name().to_string())
    });

    let (open_files, connection_count) = match file_descriptors(pid) {
        Some((files, sockets)) => (Some(files), Some(sockets)),
        None => (None, None),
    };

    Ok(ProcessReport {
        pid,
        name,
        cmdline,
        exe: process.exe().map(Path::to_path_buf),
        cwd: process.cwd().map(Path::to_path_buf),
        username,
        started_at_epoch_secs: Some(process.start_time()),
        status: Some(process.status().to_string()),
        cpu: Some(CpuSample {
            usage_percent: process.cpu_usage(),
            run_seconds: process.run_time(),
        }),
        memory: Some(MemorySample {
            rss_bytes: process.memory(),
            virtual_bytes: process.virtual_memory(),
        }),
        open_files,
        connection_count,
    })
}

/// Resolve a pid to the path of its executable image.
pub(crate) fn executable_path(pid: u32) -> Result<PathBuf, InspectError> {
    if !process_inspection_available() {
        return Err(InspectError::Unsupported);
    }

    let target = Pid::from_u32(pid);
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[target]), true);
    let process = system
        .process(target)
        .ok_or(InspectError::NoSuchProcess(pid))?;
    process
        .exe()
        .map(Path::to_path_buf)
        .ok_or(InspectError::NoExecutablePath(pid))
}

// Open files and sockets come from the fd table; sysinfo does not expose
// them. Absent on platforms without a readable fd table.
#[cfg(target_os = "linux")]
fn file_descriptors(pid: u32) -> Option<(Vec<PathBuf>, usize)> {
    let entries = std::fs::read_dir(format!("/proc/{pid}/fd")).ok()?;
    let mut files = Vec::new();
    let mut sockets = 0usize;
    for entry in entries.flatten() {
        let Ok(target) = std::fs::read_link(entry.path()) else {
            continue;
        };
        if target.to_string_lossy().starts_with("socket:") {
            sockets += 1;
        } else if target.is_absolute() {
            files.push(target);
        }
    }
    Some((files, sockets))
}

#[cfg(not(target_os = "linux"))]
fn file_descriptors(_pid: u32) -> Option<(Vec<PathBuf>, usize)> {
    None
}
