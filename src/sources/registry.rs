use crate::model::AppEntry;
use crate::sources::{Source, SourceError};
use log::{debug, info};

#[cfg(target_os = "windows")]
const UNINSTALL_KEY: &str = r"SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall";
#[cfg(target_os = "windows")]
const UNINSTALL_KEY_WOW64: &str = r"SOFTWARE\WOW6432Node\Microsoft\Windows\CurrentVersion\Uninstall";

/// Uninstall entries that carry an `InstallLocation`.
pub struct RegistrySource;

/// The values read from one uninstall subkey.
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
#[derive(Debug, Default, Clone)]
pub struct UninstallRecord {
    pub display_name: Option<String>,
    pub install_location: Option<String>,
    pub system_component: bool,
}

#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
impl UninstallRecord {
    pub fn into_entry(self) -> Option<AppEntry> {
        if self.system_component {
            return None;
        }
        let name = self.display_name?.trim().to_string();
        let location = self.install_location?.trim().trim_matches('"').to_string();
        if name.is_empty() || location.is_empty() {
            return None;
        }
        Some(AppEntry::install_dir(name, location))
    }
}

/// Merges per-hive reads. A hive that fails is logged and skipped; the
/// collector only fails when no hive could be read at all.
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
pub fn fold_hives<I>(hives: I) -> Result<Vec<AppEntry>, SourceError>
where
    I: IntoIterator<Item = (String, Result<Vec<UninstallRecord>, u32>)>,
{
    let mut entries = Vec::new();
    let mut last_error = None;
    let mut any_read = false;

    for (key, result) in hives {
        match result {
            Ok(records) => {
                debug!("{key}: {} subkeys", records.len());
                any_read = true;
                entries.extend(records.into_iter().filter_map(UninstallRecord::into_entry));
            }
            Err(code) => {
                info!("{key}: unreadable (code {code}), skipping");
                last_error = Some(SourceError::Registry { key, code });
            }
        }
    }

    match last_error {
        Some(err) if !any_read => Err(err),
        _ => Ok(entries),
    }
}

impl Source for RegistrySource {
    fn name(&self) -> &'static str {
        "registry"
    }

    #[cfg(target_os = "windows")]
    fn scan(&self) -> Result<Vec<AppEntry>, SourceError> {
        use windows_sys::Win32::System::Registry::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE};

        let hives = [
            (HKEY_LOCAL_MACHINE, "HKLM", UNINSTALL_KEY),
            (HKEY_LOCAL_MACHINE, "HKLM", UNINSTALL_KEY_WOW64),
            (HKEY_CURRENT_USER, "HKCU", UNINSTALL_KEY),
        ];
        fold_hives(hives.into_iter().map(|(root, label, path)| {
            (format!(r"{label}\{path}"), win::read_uninstall_tree(root, path))
        }))
    }

    #[cfg(not(target_os = "windows"))]
    fn scan(&self) -> Result<Vec<AppEntry>, SourceError> {
        Err(SourceError::Unsupported)
    }
}

#[cfg(target_os = "windows")]
mod win {
    use super::UninstallRecord;
    use windows_sys::Win32::Foundation::{ERROR_FILE_NOT_FOUND, ERROR_NO_MORE_ITEMS, ERROR_SUCCESS};
    use windows_sys::Win32::System::Registry::{
        RegCloseKey, RegEnumKeyExW, RegOpenKeyExW, RegQueryInfoKeyW, RegQueryValueExW, HKEY,
        KEY_READ, REG_DWORD, REG_EXPAND_SZ, REG_SZ,
    };

    /// Closes the wrapped key on drop.
    struct Key(HKEY);

    impl Drop for Key {
        fn drop(&mut self) {
            unsafe {
                RegCloseKey(self.0);
            }
        }
    }

    fn to_wide(value: &str) -> Vec<u16> {
        value.encode_utf16().chain(std::iter::once(0)).collect()
    }

    fn open(parent: HKEY, path: &str) -> Result<Option<Key>, u32> {
        let wide = to_wide(path);
        let mut handle: HKEY = std::ptr::null_mut();
        let status = unsafe { RegOpenKeyExW(parent, wide.as_ptr(), 0, KEY_READ, &mut handle) };
        if status == ERROR_FILE_NOT_FOUND {
            return Ok(None);
        }
        if status != ERROR_SUCCESS {
            return Err(status);
        }
        Ok(Some(Key(handle)))
    }

    /// Missing root key means no entries, not an error.
    pub fn read_uninstall_tree(root: HKEY, path: &str) -> Result<Vec<UninstallRecord>, u32> {
        let Some(uninstall) = open(root, path)? else {
            return Ok(Vec::new());
        };

        let mut subkey_count = 0_u32;
        let mut max_subkey_len = 0_u32;
        let status = unsafe {
            RegQueryInfoKeyW(
                uninstall.0,
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                &mut subkey_count,
                &mut max_subkey_len,
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
            )
        };
        if status != ERROR_SUCCESS {
            return Err(status);
        }

        let mut records = Vec::with_capacity(subkey_count as usize);
        let mut name_buffer = vec![0_u16; max_subkey_len as usize + 2];
        for index in 0..subkey_count {
            let mut name_len = max_subkey_len + 1;
            let status = unsafe {
                RegEnumKeyExW(
                    uninstall.0,
                    index,
                    name_buffer.as_mut_ptr(),
                    &mut name_len,
                    std::ptr::null_mut(),
                    std::ptr::null_mut(),
                    std::ptr::null_mut(),
                    std::ptr::null_mut(),
                )
            };
            if status == ERROR_NO_MORE_ITEMS {
                break;
            }
            if status != ERROR_SUCCESS {
                continue;
            }

            let subkey = String::from_utf16_lossy(&name_buffer[..name_len as usize]);
            // Unreadable subkeys are skipped.
            let Ok(Some(app_key)) = open(uninstall.0, &subkey) else {
                continue;
            };
            records.push(UninstallRecord {
                display_name: read_string(&app_key, "DisplayName"),
                install_location: read_string(&app_key, "InstallLocation"),
                system_component: read_dword(&app_key, "SystemComponent") == Some(1),
            });
        }
        Ok(records)
    }

    fn read_string(key: &Key, value_name: &str) -> Option<String> {
        let name = to_wide(value_name);
        let mut value_type = 0_u32;
        let mut size = 0_u32;
        let status = unsafe {
            RegQueryValueExW(
                key.0,
                name.as_ptr(),
                std::ptr::null(),
                &mut value_type,
                std::ptr::null_mut(),
                &mut size,
            )
        };
        if status != ERROR_SUCCESS || size == 0 {
            return None;
        }
        if value_type != REG_SZ && value_type != REG_EXPAND_SZ {
            return None;
        }

        let mut buffer = vec![0_u8; size as usize];
        let status = unsafe {
            RegQueryValueExW(
                key.0,
                name.as_ptr(),
                std::ptr::null(),
                &mut value_type,
                buffer.as_mut_ptr(),
                &mut size,
            )
        };
        if status != ERROR_SUCCESS {
            return None;
        }

        let mut wide: Vec<u16> = buffer[..size as usize]
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        while wide.last() == Some(&0) {
            wide.pop();
        }
        let value = String::from_utf16_lossy(&wide).trim().to_string();
        (!value.is_empty()).then_some(value)
    }

    fn read_dword(key: &Key, value_name: &str) -> Option<u32> {
        let name = to_wide(value_name);
        let mut value_type = 0_u32;
        let mut size = std::mem::size_of::<u32>() as u32;
        let mut value = 0_u32;
        let status = unsafe {
            RegQueryValueExW(
                key.0,
                name.as_ptr(),
                std::ptr::null(),
                &mut value_type,
                &mut value as *mut u32 as *mut u8,
                &mut size,
            )
        };
        (status == ERROR_SUCCESS && value_type == REG_DWORD).then_some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LaunchHandle;
    use std::path::PathBuf;

    fn record(name: Option<&str>, location: Option<&str>) -> UninstallRecord {
        UninstallRecord {
            display_name: name.map(String::from),
            install_location: location.map(String::from),
            system_component: false,
        }
    }

    #[test]
    fn record_with_name_and_location_becomes_entry() {
        let entry = record(Some("7-Zip"), Some(r"C:\Program Files\7-Zip\"))
            .into_entry()
            .unwrap();
        assert_eq!(entry.name, "7-Zip");
        assert_eq!(
            entry.handle,
            LaunchHandle::InstallDir(PathBuf::from(r"C:\Program Files\7-Zip\"))
        );
    }

    #[test]
    fn quoted_location_is_unquoted() {
        let entry = record(Some("Tool"), Some(r#""C:\Tools\Tool""#)).into_entry().unwrap();
        assert_eq!(entry.handle, LaunchHandle::InstallDir(PathBuf::from(r"C:\Tools\Tool")));
    }

    #[test]
    fn incomplete_records_are_dropped() {
        assert!(record(None, Some(r"C:\x")).into_entry().is_none());
        assert!(record(Some("X"), None).into_entry().is_none());
        assert!(record(Some("  "), Some(r"C:\x")).into_entry().is_none());
        assert!(record(Some("X"), Some("")).into_entry().is_none());
    }

    #[test]
    fn system_components_are_hidden() {
        let mut hidden = record(Some("VC++ Runtime"), Some(r"C:\vc"));
        hidden.system_component = true;
        assert!(hidden.into_entry().is_none());
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn unsupported_off_windows() {
        assert!(matches!(RegistrySource.scan(), Err(SourceError::Unsupported)));
    }

    type HiveRead = (String, Result<Vec<UninstallRecord>, u32>);

    #[test]
    fn failing_hive_keeps_records_from_the_others() {
        let hives: Vec<HiveRead> = vec![
            ("HKLM".to_string(), Ok(vec![record(Some("Git"), Some(r"C:\Git"))])),
            (
                "HKLM32".to_string(),
                Ok(vec![record(Some("7-Zip"), Some(r"C:\7z")), record(None, None)]),
            ),
            ("HKCU".to_string(), Err(5)),
        ];
        let entries = fold_hives(hives).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Git", "7-Zip"]);
    }

    #[test]
    fn all_hives_failing_is_an_error() {
        let hives: Vec<HiveRead> = vec![("HKLM".to_string(), Err(5)), ("HKCU".to_string(), Err(2))];
        match fold_hives(hives) {
            Err(SourceError::Registry { key, code }) => {
                assert_eq!(key, "HKCU");
                assert_eq!(code, 2);
            }
            other => panic!("expected registry error, got {other:?}"),
        }
    }

    #[test]
    fn empty_hives_are_not_an_error() {
        let hives: Vec<HiveRead> = vec![("HKLM".to_string(), Ok(Vec::new())), ("HKCU".to_string(), Err(5))];
        assert!(fold_hives(hives).unwrap().is_empty());
    }
}
