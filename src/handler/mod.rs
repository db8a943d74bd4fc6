//! Request handler module
//!
//! Routes requests to the JSON API or the static site.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
