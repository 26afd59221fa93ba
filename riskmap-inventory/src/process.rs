use std::collections::HashMap;
use std::path::Path;

use sysinfo::{ProcessesToUpdate, System};
use tracing::debug;

use riskmap_types::{PATH_UNAVAILABLE, ProcessEntry, VERSION_UNKNOWN};

use crate::version::file_version;

/// Enumerate running processes and join them against the pid → service map
/// from the service sweep.
///
/// Entries come back sorted by pid so reports are stable across runs.
pub fn scan_processes(pid_map: &HashMap<u32, String>) -> Vec<ProcessEntry> {
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::All, true);

    let mut processes = Vec::with_capacity(system.processes().len());
    for (pid, process) in system.processes() {
        let pid = pid.as_u32();
        let name = process.name().to_string_lossy().to_string();

        let path = match process.exe() {
            Some(exe) => exe.display().to_string(),
            None => PATH_UNAVAILABLE.to_string(),
        };

        let version = if path != PATH_UNAVAILABLE && Path::new(&path).exists() {
            file_version(Path::new(&path)).unwrap_or_else(|| VERSION_UNKNOWN.to_string())
        } else {
            VERSION_UNKNOWN.to_string()
        };

        let linked_service = pid_map.get(&pid).cloned();
        processes.push(ProcessEntry::new(name, pid, path, version, linked_service));
    }

    processes.sort_by_key(|process| process.pid);
    debug!(count = processes.len(), "process sweep complete");
    processes
}
