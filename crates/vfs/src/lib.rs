//! Local filesystem explorer for spyglass.
//!
//! Everything the HTTP API exposes about the machine's filesystem lives
//! here: directory and drive listings, file reading with preview
//! classification, metadata extraction, and the target-filename watch
//! list. All blocking filesystem work runs on the tokio blocking pool.

pub mod drives;
pub mod explorer;
pub mod metadata;
pub mod preview;
pub mod targets;

pub use explorer::Explorer;
pub use targets::TargetList;
