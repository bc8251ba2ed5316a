//! File metadata extraction for the metadata panel.

use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use spyglass_protocol::{BasicInfo, FileMetadata, Permissions, SystemInfo, Timestamps};

const SIZE_UNITS: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Human-readable size, two decimals above bytes.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.2} {}", SIZE_UNITS[unit])
    }
}

/// Format a filesystem timestamp in local time, log-entry style.
pub fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Collect the full metadata payload for one file.
pub fn file_metadata(path: &Path) -> Result<FileMetadata> {
    let stat = std::fs::metadata(path)
        .with_context(|| format!("stat {}", path.display()))?;

    let filename = path
        .file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
    let extension = path
        .extension()
        .map_or_else(String::new, |e| format!(".{}", e.to_string_lossy()));
    let mimetype = mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("unknown")
        .to_string();

    let basic = BasicInfo {
        filename,
        filepath: path.to_string_lossy().into_owned(),
        size: stat.len(),
        size_human: format_size(stat.len()),
        mimetype,
        extension,
    };

    let timestamps = Timestamps {
        created: stat.created().ok().map(format_timestamp),
        modified: stat.modified().ok().map(format_timestamp),
        accessed: stat.accessed().ok().map(format_timestamp),
    };

    Ok(FileMetadata {
        basic,
        timestamps,
        permissions: permissions(&stat),
        system: system_info(&stat),
    })
}

#[cfg(unix)]
fn permissions(stat: &std::fs::Metadata) -> Option<Permissions> {
    use std::os::unix::fs::MetadataExt;

    let mode = stat.mode();
    Some(Permissions {
        owner_read: mode & 0o400 != 0,
        owner_write: mode & 0o200 != 0,
        owner_execute: mode & 0o100 != 0,
        group_read: mode & 0o040 != 0,
        group_write: mode & 0o020 != 0,
        group_execute: mode & 0o010 != 0,
        other_read: mode & 0o004 != 0,
        other_write: mode & 0o002 != 0,
        other_execute: mode & 0o001 != 0,
        mode_octal: format!("{:03o}", mode & 0o777),
    })
}

#[cfg(not(unix))]
fn permissions(_stat: &std::fs::Metadata) -> Option<Permissions> {
    None
}

#[cfg(unix)]
fn system_info(stat: &std::fs::Metadata) -> SystemInfo {
    use std::os::unix::fs::MetadataExt;

    SystemInfo {
        inode: Some(stat.ino()),
        device: Some(stat.dev()),
        platform: std::env::consts::OS.to_string(),
        server_version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

#[cfg(not(unix))]
fn system_info(_stat: &std::fs::Metadata) -> SystemInfo {
    SystemInfo {
        inode: None,
        device: None,
        platform: std::env::consts::OS.to_string(),
        server_version: env!("CARGO_PKG_VERSION").to_string(),
    }
}
