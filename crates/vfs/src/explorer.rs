//! The explorer: directory listings, file reads, metadata.
//!
//! Mirrors the API's degrade-don't-fail policy: listing a bad directory
//! returns an empty item set plus an `[ERROR]` message, and reading an
//! unreadable file returns `FileContent::Error`. Real `Err` values stay
//! internal. Blocking filesystem work runs via `spawn_blocking`.

use std::path::{Path, PathBuf};

use spyglass_protocol::{DirEntry, EntryKind, FileContent, FileMetadata, OfficeKind};

use crate::drives;
use crate::metadata::{file_metadata, format_timestamp};
use crate::preview::{self, TEXT_PREVIEW_LIMIT};
use crate::targets::TargetList;

const WORD_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const POWERPOINT_MIME: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Filesystem access point for the API handlers.
///
/// `allowed_dir` is the write-protection root the UI can set; it is the
/// default listing location when a request carries no directory at all.
pub struct Explorer {
    allowed_dir: Option<PathBuf>,
    targets: TargetList,
}

impl Explorer {
    pub fn new(allowed_dir: Option<PathBuf>, targets: TargetList) -> Self {
        Self {
            allowed_dir,
            targets,
        }
    }

    pub fn allowed_dir(&self) -> Option<&Path> {
        self.allowed_dir.as_deref()
    }

    /// Point write protection (and the default listing) at a directory.
    /// Returns the canonicalized path actually stored.
    pub fn set_allowed_dir(&mut self, directory: Option<String>) -> Option<PathBuf> {
        self.allowed_dir = directory.filter(|d| !d.is_empty()).map(|d| {
            let path = PathBuf::from(d);
            std::fs::canonicalize(&path).unwrap_or(path)
        });
        self.allowed_dir.clone()
    }

    pub fn targets(&self) -> &TargetList {
        &self.targets
    }

    /// Re-read the target pattern file. Returns (old count, new count).
    pub fn reload_targets(&mut self) -> (usize, usize) {
        self.targets.reload()
    }

    /// List a directory, or the drive overview for `None`/empty input.
    pub async fn list_directory(&self, directory: Option<&str>) -> (Vec<DirEntry>, String) {
        let drive_overview = || (drives::list_drives(), "[SUCCESS] Listed available drives".to_string());

        let directory = match directory {
            // Explicit empty always means the drive overview, even with a
            // configured root.
            Some("") => return drive_overview(),
            Some(dir) => dir.to_string(),
            None => match &self.allowed_dir {
                Some(root) => root.to_string_lossy().into_owned(),
                None => return drive_overview(),
            },
        };

        let targets = self.targets.clone();
        let dir_for_task = directory.clone();
        let result = tokio::task::spawn_blocking(move || {
            list_directory_blocking(Path::new(&dir_for_task), &targets)
        })
        .await;

        match result {
            Ok(Ok(items)) => {
                let flagged = items.iter().filter(|i| i.is_target).count();
                if flagged > 0 {
                    tracing::info!("listing {directory}: {flagged} target files flagged");
                }
                (items, format!("[SUCCESS] Listed directory: {directory}"))
            }
            Ok(Err(e)) => (
                Vec::new(),
                format!("[ERROR] Cannot list directory: {e}"),
            ),
            Err(e) => (Vec::new(), format!("[ERROR] Cannot list directory: {e}")),
        }
    }

    /// Read a file for preview. Never fails; errors come back as
    /// `FileContent::Error` plus an `[ERROR]` message.
    pub async fn read_file(&self, filepath: &str) -> (FileContent, String) {
        let path = PathBuf::from(filepath);
        match tokio::task::spawn_blocking(move || read_file_blocking(&path)).await {
            Ok(result) => result,
            Err(e) => (
                FileContent::Error {
                    error: e.to_string(),
                },
                format!("[ERROR] Cannot read: {e}"),
            ),
        }
    }

    /// Full metadata for one file, or `None` plus an error message.
    pub async fn metadata(&self, filepath: &str) -> (Option<FileMetadata>, String) {
        let path = PathBuf::from(filepath);
        let display = filepath.to_string();
        match tokio::task::spawn_blocking(move || file_metadata(&path)).await {
            Ok(Ok(meta)) => (Some(meta), format!("[SUCCESS] Got metadata for {display}")),
            Ok(Err(e)) => (None, format!("[ERROR] Failed to get metadata: {e}")),
            Err(e) => (None, format!("[ERROR] Failed to get metadata: {e}")),
        }
    }
}

fn list_directory_blocking(directory: &Path, targets: &TargetList) -> anyhow::Result<Vec<DirEntry>> {
    let mut items = Vec::new();
    for entry in std::fs::read_dir(directory)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path();
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

        let item = if is_dir {
            DirEntry {
                name,
                path: path.to_string_lossy().into_owned(),
                kind: EntryKind::Directory,
                size: None,
                icon: None,
                is_target: false,
            }
        } else {
            let is_target = targets.matches(&name);
            DirEntry {
                name,
                path: path.to_string_lossy().into_owned(),
                kind: EntryKind::File,
                size: entry.metadata().ok().map(|m| m.len()),
                icon: Some(preview::icon_for(&path).to_string()),
                is_target,
            }
        };
        items.push(item);
    }
    Ok(items)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

fn read_file_blocking(path: &Path) -> (FileContent, String) {
    let display = path.display();

    if has_extension(path, "docx") {
        return match preview::extract_docx_text(path) {
            Ok(content) => (
                FileContent::Text {
                    content,
                    mimetype: WORD_MIME.to_string(),
                    is_office: true,
                    office_type: Some(OfficeKind::Word),
                },
                format!("[READ] {display} (Word document)"),
            ),
            Err(e) => read_error(e),
        };
    }

    if has_extension(path, "pptx") {
        return match preview::extract_pptx_text(path) {
            Ok(content) => (
                FileContent::Text {
                    content,
                    mimetype: POWERPOINT_MIME.to_string(),
                    is_office: true,
                    office_type: Some(OfficeKind::Powerpoint),
                },
                format!("[READ] {display} (PowerPoint presentation)"),
            ),
            Err(e) => read_error(e),
        };
    }

    let stat = match std::fs::metadata(path) {
        Ok(stat) => stat,
        Err(e) => return read_error(e.into()),
    };

    if preview::is_text_file(path) && stat.len() < TEXT_PREVIEW_LIMIT {
        return match std::fs::read(path) {
            Ok(bytes) => (
                FileContent::Text {
                    content: String::from_utf8_lossy(&bytes).into_owned(),
                    mimetype: mime_guess::from_path(path)
                        .first_raw()
                        .unwrap_or("text/plain")
                        .to_string(),
                    is_office: false,
                    office_type: None,
                },
                format!("[READ] {display}"),
            ),
            Err(e) => read_error(e.into()),
        };
    }

    (
        FileContent::Binary {
            mimetype: mime_guess::from_path(path)
                .first_raw()
                .unwrap_or("application/octet-stream")
                .to_string(),
            filename: path
                .file_name()
                .map_or_else(String::new, |n| n.to_string_lossy().into_owned()),
            size: stat.len(),
            last_modified: stat.modified().ok().map(format_timestamp),
        },
        format!("[READ] {display}"),
    )
}

fn read_error(e: anyhow::Error) -> (FileContent, String) {
    (
        FileContent::Error {
            error: e.to_string(),
        },
        format!("[ERROR] Cannot read: {e}"),
    )
}
