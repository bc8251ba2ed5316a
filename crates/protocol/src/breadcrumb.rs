//! Breadcrumb decomposition for heterogeneous path syntaxes.
//!
//! The explorer UI shows the current location as a row of clickable
//! segments from the drive root down to the open directory. Paths arrive
//! from whatever filesystem the host is running on, so a single input may
//! be POSIX (`/home/user`) or drive-letter style (`C:\Users\me`). The
//! builder classifies the whole path once, then emits one segment per
//! component, each carrying the exact string to feed back into the
//! directory-listing endpoint when clicked.
//!
//! The builder is pure and never fails: malformed input degrades to
//! best-effort segmentation, and the root "Drives" segment is always
//! present.

use serde::{Deserialize, Serialize};

/// Label shown for the navigation root (the drive/mount overview).
pub const ROOT_LABEL: &str = "Drives";

/// One clickable step in the navigation bar.
///
/// `target_path` is what the segment navigates to when activated; it is a
/// valid `directory` value for the listing endpoint. The root segment has
/// an empty `target_path`, which the explorer interprets as "list drives".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadcrumbSegment {
    pub label: String,
    pub target_path: String,
}

impl BreadcrumbSegment {
    fn new(label: impl Into<String>, target_path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target_path: target_path.into(),
        }
    }
}

/// Which separator family a path uses.
///
/// Classification is binary and decided once for the entire path; segments
/// are never re-classified individually. Callers that already know the
/// syntax (e.g. because the host reported its platform) should pass it to
/// [`build_with_syntax`] instead of relying on detection: mixed-separator
/// or otherwise exotic paths are inherently ambiguous, and under [`detect`]
/// a path classified as POSIX keeps literal backslashes as ordinary name
/// characters.
///
/// [`detect`]: PathSyntax::detect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSyntax {
    Posix,
    DriveLetter,
}

impl PathSyntax {
    /// Heuristic classification: a path containing the pattern
    /// `<ascii letter>:\` is drive-letter syntax, everything else POSIX.
    pub fn detect(path: &str) -> Self {
        let bytes = path.as_bytes();
        let drive_pattern = bytes.windows(3).any(|w| {
            w[0].is_ascii_alphabetic() && w[1] == b':' && w[2] == b'\\'
        });
        if drive_pattern {
            Self::DriveLetter
        } else {
            Self::Posix
        }
    }

    /// The separator used when reconstructing target paths.
    pub const fn separator(self) -> char {
        match self {
            Self::Posix => '/',
            Self::DriveLetter => '\\',
        }
    }
}

/// Decompose `path` into breadcrumb segments, detecting the syntax first.
///
/// The returned sequence is ordered root-to-leaf and always starts with
/// the root segment `{ "Drives", "" }`. Empty input yields only the root.
pub fn build(path: &str) -> Vec<BreadcrumbSegment> {
    build_with_syntax(path, PathSyntax::detect(path))
}

/// Decompose `path` using a caller-supplied syntax classification.
pub fn build_with_syntax(path: &str, syntax: PathSyntax) -> Vec<BreadcrumbSegment> {
    let mut segments = vec![BreadcrumbSegment::new(ROOT_LABEL, "")];
    if path.is_empty() {
        return segments;
    }

    match syntax {
        PathSyntax::DriveLetter => push_drive_segments(path, &mut segments),
        PathSyntax::Posix => push_posix_segments(path, &mut segments),
    }

    segments
}

/// Drive-letter paths: the two-character drive token becomes the first
/// real segment and navigates to `X:\`; the remainder is split on `\`.
fn push_drive_segments(path: &str, segments: &mut Vec<BreadcrumbSegment>) {
    let bytes = path.as_bytes();
    let rest = if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        let drive = &path[..2];
        segments.push(BreadcrumbSegment::new(drive, format!("{drive}\\")));
        &path[2..]
    } else {
        // No drive prefix despite backslash syntax: degrade to a plain
        // component walk so the caller still gets clickable segments.
        path
    };

    let mut current = segments
        .last()
        .map(|s| s.target_path.clone())
        .unwrap_or_default();
    for component in rest.split('\\').filter(|c| !c.is_empty()) {
        if !current.is_empty() && !current.ends_with('\\') {
            current.push('\\');
        }
        current.push_str(component);
        segments.push(BreadcrumbSegment::new(component, current.clone()));
    }
}

/// POSIX paths: a leading `/` becomes an explicit root segment, then one
/// segment per non-empty slash-delimited component.
fn push_posix_segments(path: &str, segments: &mut Vec<BreadcrumbSegment>) {
    let rooted = path.starts_with('/');
    if rooted {
        segments.push(BreadcrumbSegment::new("/", "/"));
    }

    let mut current = if rooted { String::from("/") } else { String::new() };
    for component in path.split('/').filter(|c| !c.is_empty()) {
        if !current.is_empty() && !current.ends_with('/') {
            current.push('/');
        }
        current.push_str(component);
        segments.push(BreadcrumbSegment::new(component, current.clone()));
    }
}
