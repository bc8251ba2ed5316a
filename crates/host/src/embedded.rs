//! Embedded UI assets for single-binary distribution
//!
//! Uses rust-embed to compile the browser UI (HTML, CSS, JS) into the
//! binary so the host ships as one file.

use rust_embed::RustEmbed;

/// Embedded UI assets from the ui/ directory
#[derive(RustEmbed)]
#[folder = "../../ui/"]
#[include = "index.html"]
#[include = "*.js"]
#[include = "*.css"]
pub struct UiAssets;

/// Get a file from embedded assets with proper MIME type
pub fn get_asset(path: &str) -> Option<(Vec<u8>, &'static str)> {
    // Handle root path
    let path = if path.is_empty() || path == "/" {
        "index.html"
    } else {
        path.trim_start_matches('/')
    };

    UiAssets::get(path).map(|file| {
        let mime = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream");
        (file.data.into_owned(), mime)
    })
}
