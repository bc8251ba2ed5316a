//! Drive and mount enumeration for the navigation root.
//!
//! The breadcrumb root ("Drives") lists whatever top-level storage the
//! platform exposes: lettered drives on Windows, `/media` and `/mnt`
//! mounts on Unix, plus the server's working directory as a convenient
//! entry point.

use spyglass_protocol::{DirEntry, EntryKind};

/// List available drives/mounts, root-listing shape.
pub fn list_drives() -> Vec<DirEntry> {
    let mut drives = platform_drives();

    if let Ok(cwd) = std::env::current_dir() {
        drives.push(DirEntry {
            name: "Current Working Directory".to_string(),
            path: cwd.to_string_lossy().into_owned(),
            kind: EntryKind::Directory,
            size: None,
            icon: None,
            is_target: false,
        });
    }

    drives
}

#[cfg(windows)]
fn platform_drives() -> Vec<DirEntry> {
    // Probe each letter; fs::metadata on "X:\" fails for absent drives.
    (b'A'..=b'Z')
        .filter_map(|letter| {
            let letter = letter as char;
            let path = format!("{letter}:\\");
            std::fs::metadata(&path).ok().map(|_| DirEntry {
                name: format!("Drive {letter}"),
                path,
                kind: EntryKind::Drive,
                size: None,
                icon: None,
                is_target: false,
            })
        })
        .collect()
}

#[cfg(not(windows))]
fn platform_drives() -> Vec<DirEntry> {
    // Removable/secondary storage shows up under /media or /mnt.
    let Ok(mounts) = std::fs::read_to_string("/proc/mounts") else {
        return Vec::new();
    };

    mounts
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .filter(|path| path.starts_with("/media/") || path.starts_with("/mnt/"))
        .map(|path| {
            let name = std::path::Path::new(path)
                .file_name()
                .map_or_else(|| path.to_string(), |n| n.to_string_lossy().into_owned());
            DirEntry {
                name: format!("Drive {name}"),
                path: path.to_string(),
                kind: EntryKind::Drive,
                size: None,
                icon: None,
                is_target: false,
            }
        })
        .collect()
}
