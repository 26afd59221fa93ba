use std::path::Path;

/// Product version of an executable, read from its embedded version
/// resource.
///
/// Returns `None` when the file carries no version info, cannot be read, or
/// the platform has no notion of one.
pub fn file_version(path: &Path) -> Option<String> {
    #[cfg(windows)]
    {
        win::query_version(path)
    }
    #[cfg(not(windows))]
    {
        let _ = path;
        None
    }
}

#[cfg(windows)]
mod win {
    use std::os::windows::ffi::OsStrExt;
    use std::path::Path;

    use windows::Win32::Storage::FileSystem::{
        GetFileVersionInfoSizeW, GetFileVersionInfoW, VS_FIXEDFILEINFO, VerQueryValueW,
    };
    use windows::core::PCWSTR;

    fn wide(s: &std::ffi::OsStr) -> Vec<u16> {
        s.encode_wide().chain(std::iter::once(0)).collect()
    }

    pub(super) fn query_version(path: &Path) -> Option<String> {
        let file = wide(path.as_os_str());
        let root = wide(std::ffi::OsStr::new("\\"));

        unsafe {
            let size = GetFileVersionInfoSizeW(PCWSTR(file.as_ptr()), None);
            if size == 0 {
                return None;
            }

            let mut data = vec![0u8; size as usize];
            GetFileVersionInfoW(
                PCWSTR(file.as_ptr()),
                None,
                size,
                data.as_mut_ptr() as *mut core::ffi::c_void,
            )
            .ok()?;

            let mut info: *mut VS_FIXEDFILEINFO = std::ptr::null_mut();
            let mut len = 0u32;
            let found = VerQueryValueW(
                data.as_ptr() as *const core::ffi::c_void,
                PCWSTR(root.as_ptr()),
                &mut info as *mut _ as *mut *mut core::ffi::c_void,
                &mut len,
            );
            if !found.as_bool() || info.is_null() || (len as usize) < size_of::<VS_FIXEDFILEINFO>() {
                return None;
            }

            let info = &*info;
            let ms = info.dwFileVersionMS;
            let ls = info.dwFileVersionLS;
            Some(format!(
                "{}.{}.{}.{}",
                ms >> 16,
                ms & 0xffff,
                ls >> 16,
                ls & 0xffff
            ))
        }
    }
}

#[cfg(all(test, not(windows)))]
mod tests {
    use super::*;

    #[test]
    fn non_windows_has_no_version_info() {
        assert_eq!(file_version(Path::new("/bin/sh")), None);
    }
}
