//! Shared protocol types for spyglass
//!
//! Defines the JSON structures exchanged between the host and the browser
//! UI, plus the breadcrumb builder the navigation bar is rendered from.

pub mod breadcrumb;
pub mod messages;

pub use breadcrumb::{build, build_with_syntax, BreadcrumbSegment, PathSyntax};
pub use messages::*;
