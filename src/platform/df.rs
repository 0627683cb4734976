//! Disk listing via POSIX `df`, shared by macOS and Linux.

use std::collections::HashMap;
use std::fs;

use crate::core::telemetry::disk::{is_physical_mount, DiskProbe};
use crate::core::telemetry::DiskStats;
use crate::error::{CntrlError, Result};
use crate::platform::command;

const UNKNOWN_FS_TYPE: &str = "Unknown";

/// One row of `df -k -P`, sizes already in bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct DfEntry {
    pub device: String,
    pub size: u64,
    pub used: u64,
    pub available: u64,
    pub mount: String,
}

/// How the filesystem type of a device is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsTypeLookup {
    /// `diskutil info <device>` per volume.
    Diskutil,
    /// One read of `/proc/mounts` per listing.
    ProcMounts,
}

pub struct DfDiskProbe {
    lookup: FsTypeLookup,
}

impl DfDiskProbe {
    pub fn new(lookup: FsTypeLookup) -> Self {
        Self { lookup }
    }
}

impl DiskProbe for DfDiskProbe {
    fn list(&self) -> Result<Vec<DiskStats>> {
        let output = command::run("df", &["-k", "-P"])
            .map_err(|e| CntrlError::metric_collection(format!("df: {}", e)))?;
        let entries = parse_df_output(&output);

        let mounts = match self.lookup {
            FsTypeLookup::ProcMounts => fs::read_to_string("/proc/mounts")
                .map(|text| parse_proc_mounts(&text))
                .unwrap_or_default(),
            FsTypeLookup::Diskutil => HashMap::new(),
        };

        Ok(entries
            .into_iter()
            .map(|entry| {
                let fs_type = match self.lookup {
                    FsTypeLookup::Diskutil => diskutil_fs_type(&entry.device),
                    FsTypeLookup::ProcMounts => mounts.get(&entry.mount).cloned(),
                }
                .unwrap_or_else(|| UNKNOWN_FS_TYPE.to_string());

                DiskStats::new(
                    entry.device,
                    fs_type,
                    entry.mount,
                    entry.size,
                    entry.used,
                    entry.available,
                )
            })
            .collect())
    }
}

fn diskutil_fs_type(device: &str) -> Option<String> {
    match command::run("diskutil", &["info", device]) {
        Ok(info) => parse_diskutil_fs_type(&info),
        Err(e) => {
            log::debug!("diskutil info {} failed: {}", device, e);
            None
        }
    }
}

/// Parse `df -k -P` and keep physical volumes only. The header and
/// malformed rows are dropped.
pub fn parse_df_output(output: &str) -> Vec<DfEntry> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let (fields, mount) = leading_fields::<5>(line)?;
            let size_kb = fields[1].parse::<u64>().ok()?;
            let used_kb = fields[2].parse::<u64>().ok()?;
            let avail_kb = fields[3].parse::<u64>().ok()?;
            let mount = mount.to_string();
            let device = fields[0];

            if !is_physical_mount(device, &mount) {
                return None;
            }

            Some(DfEntry {
                device: device.to_string(),
                size: size_kb.saturating_mul(1024),
                used: used_kb.saturating_mul(1024),
                available: avail_kb.saturating_mul(1024),
                mount,
            })
        })
        .collect()
}

/// Split off `N` whitespace-separated fields and return them with the rest
/// of the line, whose inner spacing is kept verbatim.
fn leading_fields<const N: usize>(line: &str) -> Option<([&str; N], &str)> {
    let mut fields = [""; N];
    let mut rest = line.trim();
    for field in fields.iter_mut() {
        let end = rest.find(char::is_whitespace)?;
        *field = &rest[..end];
        rest = rest[end..].trim_start();
    }
    (!rest.is_empty()).then_some((fields, rest))
}

/// Filesystem type from `diskutil info` output.
pub fn parse_diskutil_fs_type(info: &str) -> Option<String> {
    ["Type (Bundle):", "File System Personality:"]
        .iter()
        .find_map(|key| {
            info.lines().find_map(|line| {
                let value = line.trim().strip_prefix(key)?.trim();
                (!value.is_empty()).then(|| value.to_string())
            })
        })
}

/// Mount point to filesystem type, from `/proc/mounts`. The first entry
/// for a mount point wins.
pub fn parse_proc_mounts(text: &str) -> HashMap<String, String> {
    let mut mounts = HashMap::new();
    for line in text.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            continue;
        }
        // spaces in mount points are octal-escaped
        let mount = fields[1].replace("\\040", " ");
        mounts.entry(mount).or_insert_with(|| fields[2].to_string());
    }
    mounts
}
