//! Discovery of netlist files for the CLI frontend.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{NetpathError, Result};

/// File extension of netlist sources.
pub const VERILOG_EXTENSION: &str = "v";

/// List the `.v` files directly inside `dir`, sorted by path.
pub fn find_verilog_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| NetpathError::ScanError {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;
        let is_verilog = entry
            .path()
            .extension()
            .is_some_and(|ext| ext == VERILOG_EXTENSION);
        if entry.file_type().is_file() && is_verilog {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_finds_only_verilog_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("c17.v"), "module c17();").unwrap();
        fs::write(dir.path().join("adder.v"), "module adder();").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("nested.v")).unwrap();
        fs::write(dir.path().join("nested.v").join("deep.v"), "").unwrap();

        let files = find_verilog_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["adder.v", "c17.v"]);
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_verilog_files(dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, NetpathError::ScanError { .. }));
    }
}
