//! Infrastructure Layer
//!
//! Everything that touches the file system.
//!
//! ## Structure
//!
//! - `walker` - Digest walker over a package tree
//! - `workbook` - Spreadsheet loading
//! - `fs` - Atomic writes

pub mod fs;
pub mod walker;
pub mod workbook;

pub use fs::write_atomic;
pub use walker::{digest_file, DigestWalker, WalkError, WalkedFile};
pub use workbook::{read_workbook, Sheet, WorkbookError};
