//! Common utility functions.

pub mod fs;

// Re-export commonly used items
pub use fs::{ensure_file, expand_path};
