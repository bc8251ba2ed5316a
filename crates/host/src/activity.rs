//! Append-only activity log with duplicate suppression.
//!
//! Every file-access attempt (read, metadata, download, blocked write or
//! delete, config change) becomes one entry. Browsers ask for the same
//! resource in quick bursts, so repeats are suppressed: the same
//! (action, path, status) within two seconds is dropped, and media
//! fetches (the `<img>`/`<video>`/`<audio>`/PDF element re-requesting its
//! source) get a wider five-second window keyed by path alone. The
//! suppression maps are pruned as they are touched so they stay bounded.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::Local;
use spyglass_protocol::{LogAction, LogEntry, LogStatus};

const OP_WINDOW: Duration = Duration::from_secs(2);
const OP_PRUNE: Duration = Duration::from_secs(5);
const MEDIA_WINDOW: Duration = Duration::from_secs(5);
const MEDIA_PRUNE: Duration = Duration::from_secs(30);

/// Is this MIME type one the media viewers re-request on their own?
pub fn is_media_mime(mime: &str) -> bool {
    mime.starts_with("image/")
        || mime.starts_with("video/")
        || mime.starts_with("audio/")
        || mime == "application/pdf"
}

#[derive(Default)]
struct LogState {
    entries: Vec<LogEntry>,
    recent_ops: HashMap<(LogAction, String, LogStatus), Instant>,
    recent_media: HashMap<String, Instant>,
}

/// Shared, append-only log of file-access attempts.
#[derive(Default)]
pub struct ActivityLog {
    state: Mutex<LogState>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a non-media operation. Returns the entry, or `None` if it
    /// was suppressed as a duplicate.
    pub fn record(
        &self,
        action: LogAction,
        path: &str,
        status: LogStatus,
        message: Option<String>,
    ) -> Option<LogEntry> {
        self.record_at(action, path, status, message, false, Instant::now())
    }

    /// Record a media access (image/video/audio/PDF source fetch).
    pub fn record_media(
        &self,
        action: LogAction,
        path: &str,
        status: LogStatus,
    ) -> Option<LogEntry> {
        self.record_at(action, path, status, None, true, Instant::now())
    }

    /// Snapshot of all entries, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.state.lock().expect("log lock").entries.clone()
    }

    fn record_at(
        &self,
        action: LogAction,
        path: &str,
        status: LogStatus,
        message: Option<String>,
        is_media: bool,
        now: Instant,
    ) -> Option<LogEntry> {
        // Media URLs carry cache-busting query strings; log the bare path.
        let clean_path = path.split('?').next().unwrap_or(path).to_string();

        let mut state = self.state.lock().expect("log lock");

        if is_media {
            if let Some(last) = state.recent_media.get(&clean_path) {
                if now.duration_since(*last) < MEDIA_WINDOW {
                    return None;
                }
            }
            state.recent_media.insert(clean_path.clone(), now);
            state
                .recent_media
                .retain(|_, seen| now.duration_since(*seen) < MEDIA_PRUNE);
        } else {
            let key = (action, clean_path.clone(), status);
            if let Some(last) = state.recent_ops.get(&key) {
                if now.duration_since(*last) < OP_WINDOW {
                    return None;
                }
            }
            state.recent_ops.insert(key, now);
            state
                .recent_ops
                .retain(|_, seen| now.duration_since(*seen) < OP_PRUNE);
        }

        let entry = LogEntry {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            action,
            path: clean_path,
            status,
            message,
        };
        state.entries.push(entry.clone());
        Some(entry)
    }
}
