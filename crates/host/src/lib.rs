// spyglass-host library
// Axum HTTP host serving the embedded browser UI and the explorer API

// Activity log (append-only, duplicate-suppressed)
pub mod activity;

// REST API
pub mod api;

// Configuration
pub mod config;

// Embedded UI assets (single-binary distribution)
pub mod embedded;
