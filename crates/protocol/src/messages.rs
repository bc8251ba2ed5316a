//! JSON payloads for the spyglass HTTP API.
//!
//! Every endpoint the browser UI talks to has its request/response pair
//! here so the host and any other consumer agree on field names. Messages
//! mirror what the server actually sends; optional fields are omitted from
//! the wire rather than serialized as null where the UI treats absence and
//! null the same.

use serde::{Deserialize, Serialize};

use crate::breadcrumb::BreadcrumbSegment;

/// What a directory listing entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Drive,
    Directory,
    File,
}

/// One row in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub is_target: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListRequest {
    /// `None` means "use the configured root"; an empty string means
    /// "list drives".
    #[serde(default)]
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub items: Vec<DirEntry>,
    pub message: String,
}

/// Office formats the preview pipeline extracts text from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfficeKind {
    Word,
    Powerpoint,
}

/// Result of reading a file for preview, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FileContent {
    /// Previewable text, either raw file contents or text extracted from
    /// an Office container.
    Text {
        content: String,
        mimetype: String,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        is_office: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        office_type: Option<OfficeKind>,
    },
    /// Not previewable as text; the UI picks a media viewer (or the
    /// unsupported-file panel) from the mimetype.
    Binary {
        mimetype: String,
        filename: String,
        size: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        last_modified: Option<String>,
    },
    /// The read failed; degrade to an error panel, never a 500.
    Error { error: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadRequest {
    pub filepath: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadResponse {
    pub data: FileContent,
    pub message: String,
}

/// Basic file facts shown at the top of the metadata panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub filename: String,
    pub filepath: String,
    pub size: u64,
    pub size_human: String,
    pub mimetype: String,
    pub extension: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessed: Option<String>,
}

/// Unix permission bits; absent on platforms without a mode word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    pub owner_read: bool,
    pub owner_write: bool,
    pub owner_execute: bool,
    pub group_read: bool,
    pub group_write: bool,
    pub group_execute: bool,
    pub other_read: bool,
    pub other_write: bool,
    pub other_execute: bool,
    pub mode_octal: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inode: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<u64>,
    pub platform: String,
    pub server_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub basic: BasicInfo,
    pub timestamps: Timestamps,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Permissions>,
    pub system: SystemInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataRequest {
    pub filepath: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FileMetadata>,
    pub message: String,
}

/// What kind of file access a log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogAction {
    Read,
    Metadata,
    Download,
    Write,
    Delete,
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogStatus {
    Success,
    Error,
    Blocked,
}

/// One line of the append-only activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub action: LogAction,
    pub path: String,
    pub status: LogStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsResponse {
    pub logs: Vec<LogEntry>,
}

/// Request body for the (always refused) write and delete endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationRequest {
    pub filepath: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetRootRequest {
    #[serde(default)]
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreadcrumbRequest {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreadcrumbResponse {
    pub segments: Vec<BreadcrumbSegment>,
}
