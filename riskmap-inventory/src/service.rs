use std::collections::{BTreeMap, HashMap};

use riskmap_types::ServiceEntry;

use crate::InventoryError;

/// Raw output of one service sweep: the entries themselves, per-state
/// totals, and the pid → service-name map used to link processes to the
/// running service that owns them.
#[derive(Debug, Default)]
pub struct ServiceScan {
    pub services: Vec<ServiceEntry>,
    pub state_counts: BTreeMap<String, u64>,
    pub pid_map: HashMap<u32, String>,
}

/// Enumerate installed services.
///
/// Only Windows hosts carry a service control manager; elsewhere this
/// returns an empty scan so the rest of the snapshot still runs.
pub fn scan_services() -> Result<ServiceScan, InventoryError> {
    #[cfg(windows)]
    {
        win::enumerate()
    }
    #[cfg(not(windows))]
    {
        tracing::warn!("service inventory requires Windows; emitting an empty service list");
        Ok(ServiceScan::default())
    }
}

#[cfg(windows)]
mod win {
    use std::collections::{BTreeMap, HashMap};
    use std::path::Path;

    use tracing::{debug, warn};
    use windows::Win32::Foundation::ERROR_MORE_DATA;
    use windows::Win32::Security::SC_HANDLE;
    use windows::Win32::System::Services::{
        CloseServiceHandle, ENUM_SERVICE_STATUS_PROCESSW, EnumServicesStatusExW, OpenSCManagerW,
        OpenServiceW, QUERY_SERVICE_CONFIGW, QueryServiceConfigW, SC_ENUM_PROCESS_INFO,
        SC_MANAGER_ENUMERATE_SERVICE, SERVICE_QUERY_CONFIG, SERVICE_STATE_ALL, SERVICE_WIN32,
    };
    use windows::core::PCWSTR;

    use riskmap_types::{PATH_UNAVAILABLE, ServiceEntry, ServiceState, VERSION_UNKNOWN};

    use super::ServiceScan;
    use crate::InventoryError;
    use crate::path::clean_image_path;
    use crate::version::file_version;

    struct ScmHandle(SC_HANDLE);

    impl Drop for ScmHandle {
        fn drop(&mut self) {
            unsafe {
                let _ = CloseServiceHandle(self.0);
            }
        }
    }

    pub(super) fn enumerate() -> Result<ServiceScan, InventoryError> {
        let scm = unsafe { OpenSCManagerW(PCWSTR::null(), PCWSTR::null(), SC_MANAGER_ENUMERATE_SERVICE) }
            .map_err(|e| InventoryError::Services(format!("OpenSCManagerW: {e}")))?;
        let scm = ScmHandle(scm);

        let mut scan = ServiceScan::default();
        for status in enum_service_statuses(&scm)? {
            let name = pwstr_to_string(status.lpServiceName);
            let display_name = pwstr_to_string(status.lpDisplayName);
            let state = ServiceState::from_win32(status.ServiceStatusProcess.dwCurrentState.0 as u32);
            let pid = status.ServiceStatusProcess.dwProcessId;

            if state == ServiceState::Running && pid != 0 {
                scan.pid_map.insert(pid, name.clone());
            }
            *scan.state_counts.entry(state.to_string()).or_insert(0) += 1;

            let (path, version) = match query_image_path(&scm, &name).and_then(|raw| clean_image_path(&raw)) {
                Some(path) => {
                    let version = if Path::new(&path).exists() {
                        file_version(Path::new(&path)).unwrap_or_else(|| VERSION_UNKNOWN.to_string())
                    } else {
                        "Path not found".to_string()
                    };
                    (path, version)
                }
                None => (PATH_UNAVAILABLE.to_string(), VERSION_UNKNOWN.to_string()),
            };

            scan.services.push(ServiceEntry::new(name, display_name, state, path, version));
        }

        debug!(count = scan.services.len(), "service sweep complete");
        Ok(scan)
    }

    fn enum_service_statuses(scm: &ScmHandle) -> Result<Vec<ENUM_SERVICE_STATUS_PROCESSW>, InventoryError> {
        let mut buffer: Vec<u8> = Vec::new();
        let mut bytes_needed = 0u32;
        let mut returned = 0u32;
        let mut resume = 0u32;

        // First pass with an empty buffer yields the required size.
        loop {
            let result = unsafe {
                EnumServicesStatusExW(
                    scm.0,
                    SC_ENUM_PROCESS_INFO,
                    SERVICE_WIN32,
                    SERVICE_STATE_ALL,
                    if buffer.is_empty() { None } else { Some(buffer.as_mut_slice()) },
                    &mut bytes_needed,
                    &mut returned,
                    Some(&mut resume),
                    PCWSTR::null(),
                )
            };

            match result {
                Ok(()) => break,
                Err(e) if e.code() == ERROR_MORE_DATA.to_hresult() => {
                    buffer.resize(buffer.len() + bytes_needed as usize, 0);
                }
                Err(e) => {
                    return Err(InventoryError::Services(format!("EnumServicesStatusExW: {e}")));
                }
            }
        }

        let statuses = unsafe {
            std::slice::from_raw_parts(
                buffer.as_ptr() as *const ENUM_SERVICE_STATUS_PROCESSW,
                returned as usize,
            )
        };
        Ok(statuses.to_vec())
    }

    fn query_image_path(scm: &ScmHandle, name: &str) -> Option<String> {
        let wide: Vec<u16> = name.encode_utf16().chain(std::iter::once(0)).collect();
        let service = unsafe { OpenServiceW(scm.0, PCWSTR(wide.as_ptr()), SERVICE_QUERY_CONFIG) }
            .map_err(|e| warn!(name, error = %e, "OpenServiceW failed"))
            .ok()?;
        let service = ScmHandle(service);

        let mut needed = 0u32;
        unsafe {
            let _ = QueryServiceConfigW(service.0, None, 0, &mut needed);
        }
        if needed == 0 {
            return None;
        }

        let mut buffer = vec![0u8; needed as usize];
        let config = buffer.as_mut_ptr() as *mut QUERY_SERVICE_CONFIGW;
        unsafe {
            QueryServiceConfigW(service.0, Some(config), needed, &mut needed)
                .map_err(|e| warn!(name, error = %e, "QueryServiceConfigW failed"))
                .ok()?;
            let raw = pwstr_to_string((*config).lpBinaryPathName);
            if raw.is_empty() { None } else { Some(raw) }
        }
    }

    fn pwstr_to_string(s: windows::core::PWSTR) -> String {
        if s.is_null() {
            return String::new();
        }
        unsafe { s.to_string().unwrap_or_default() }
    }
}
