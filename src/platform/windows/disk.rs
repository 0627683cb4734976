use std::ffi::OsStr;
use std::iter;
use std::os::windows::ffi::OsStrExt;
use std::ptr;

use windows_sys::Win32::Storage::FileSystem::{
    GetDiskFreeSpaceExW, GetDriveTypeW, GetLogicalDrives, GetVolumeInformationW,
};

use crate::core::telemetry::disk::DiskProbe;
use crate::core::telemetry::DiskStats;
use crate::error::Result;

const DRIVE_FIXED: u32 = 3;

/// Fixed drives, by letter.
#[derive(Debug, Default)]
pub struct FixedDriveProbe;

fn wide(s: &str) -> Vec<u16> {
    OsStr::new(s).encode_wide().chain(iter::once(0)).collect()
}

/// Drive letters present in a `GetLogicalDrives` bitmask.
pub fn drive_letters(mask: u32) -> Vec<char> {
    (0..26u8)
        .filter(|bit| mask & (1 << bit) != 0)
        .map(|bit| (b'A' + bit) as char)
        .collect()
}

fn filesystem_name(root: &[u16]) -> Option<String> {
    let mut name = [0u16; 64];
    // SAFETY: root is NUL-terminated; the name buffer length is passed
    let ok = unsafe {
        GetVolumeInformationW(
            root.as_ptr(),
            ptr::null_mut(),
            0,
            ptr::null_mut(),
            ptr::null_mut(),
            ptr::null_mut(),
            name.as_mut_ptr(),
            name.len() as u32,
        )
    };
    if ok == 0 {
        return None;
    }
    let len = name.iter().position(|&c| c == 0).unwrap_or(name.len());
    Some(String::from_utf16_lossy(&name[..len]))
}

fn drive_stats(letter: char) -> Option<DiskStats> {
    let root = wide(&format!("{}:\\", letter));

    // SAFETY: root is NUL-terminated
    if unsafe { GetDriveTypeW(root.as_ptr()) } != DRIVE_FIXED {
        return None;
    }

    let (mut available, mut total, mut total_free) = (0u64, 0u64, 0u64);
    // SAFETY: root is NUL-terminated and the out-pointers are valid
    let ok = unsafe { GetDiskFreeSpaceExW(root.as_ptr(), &mut available, &mut total, &mut total_free) };
    if ok == 0 {
        log::debug!("GetDiskFreeSpaceExW failed for {}:", letter);
        return None;
    }

    let fs_type = filesystem_name(&root).unwrap_or_else(|| "Unknown".to_string());
    let drive = format!("{}:", letter);
    Some(DiskStats::new(
        drive.clone(),
        fs_type,
        drive,
        total,
        total.saturating_sub(total_free),
        available,
    ))
}

impl DiskProbe for FixedDriveProbe {
    fn list(&self) -> Result<Vec<DiskStats>> {
        // SAFETY: no arguments
        let mask = unsafe { GetLogicalDrives() };
        Ok(drive_letters(mask).into_iter().filter_map(drive_stats).collect())
    }
}
