/// Launcher install-path lookup in the Windows registry.
///
/// Reads `REG_SZ` values under `HKEY_LOCAL_MACHINE`. A missing key or value
/// is reported as `None`, exactly like a launcher that is not installed.
use super::RegistryKey;
use std::path::PathBuf;
use tracing::debug;
use windows::core::PCWSTR;
use windows::Win32::Foundation::ERROR_SUCCESS;
use windows::Win32::System::Registry::{RegGetValueW, HKEY_LOCAL_MACHINE, RRF_RT_REG_SZ};

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Read a string value from `HKEY_LOCAL_MACHINE\<key.subkey()>`.
pub fn read_install_path(key: RegistryKey) -> Option<PathBuf> {
    let subkey = to_wide(key.subkey());
    let value = to_wide(key.value_name());
    let subkey_ptr = PCWSTR(subkey.as_ptr());
    let value_ptr = PCWSTR(value.as_ptr());

    // First call: query the required buffer size in bytes.
    let mut size: u32 = 0;
    let status = unsafe {
        RegGetValueW(
            HKEY_LOCAL_MACHINE,
            subkey_ptr,
            value_ptr,
            RRF_RT_REG_SZ,
            None,
            None,
            Some(&mut size as *mut u32),
        )
    };
    if status != ERROR_SUCCESS || size == 0 {
        debug!("Registry value {}\\{} not present", key.subkey(), key.value_name());
        return None;
    }

    let mut buffer = vec![0u16; (size as usize).div_ceil(2)];
    let status = unsafe {
        RegGetValueW(
            HKEY_LOCAL_MACHINE,
            subkey_ptr,
            value_ptr,
            RRF_RT_REG_SZ,
            None,
            Some(buffer.as_mut_ptr().cast()),
            Some(&mut size as *mut u32),
        )
    };
    if status != ERROR_SUCCESS {
        debug!("Registry read of {}\\{} failed: {status:?}", key.subkey(), key.value_name());
        return None;
    }

    let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    let value = String::from_utf16_lossy(&buffer[..len]);
    if value.trim().is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}
