//! Local file system helpers

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Write `content` to `path` atomically
///
/// The content goes to a temporary file in the same directory which is then
/// renamed over `path`, so readers see either the old file or the complete new
/// one. Parent directories are created as needed.
pub fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn write_atomic_new_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("acct.mets.xml");

        write_atomic(&path, "<mets/>").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "<mets/>");
    }

    #[test]
    fn write_atomic_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("acct.mets.xml");

        fs::write(&path, "Original").unwrap();
        write_atomic(&path, "Replaced").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "Replaced");
    }

    #[test]
    fn write_atomic_creates_parent_dirs_and_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out.xml");

        write_atomic(&path, "x").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path().join("nested"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("out.xml")]);
    }
}
