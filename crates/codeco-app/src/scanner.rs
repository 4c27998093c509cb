//! EDI file discovery

use codeco_types::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions treated as EDIFACT interchanges
const EDI_EXTENSIONS: &[&str] = &["edi", "edifact", "txt"];

/// Check if a path looks like an EDI file
pub fn is_edi_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| EDI_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Scan a directory for EDI files, sorted by file name
pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(Error::FileNotFound(dir.display().to_string()));
    }

    if !dir.is_dir() {
        return Err(Error::FileNotFound(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && is_edi_file(path))
        .collect();

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// A single file, or every EDI file below a directory
pub fn collect_inputs(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_dir() {
        scan_directory(path)
    } else if path.exists() {
        Ok(vec![path.to_path_buf()])
    } else {
        Err(Error::FileNotFound(path.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_edi_file() {
        assert!(is_edi_file(Path::new("a.edi")));
        assert!(is_edi_file(Path::new("a.EDI")));
        assert!(!is_edi_file(Path::new("a.json")));
        assert!(!is_edi_file(Path::new("edi")));
    }

    #[test]
    fn test_scan_directory() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("b.edi"), "").unwrap();
        fs::write(dir.path().join("sub").join("a.edi"), "").unwrap();
        fs::write(dir.path().join("notes.json"), "").unwrap();

        let files = scan_directory(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.edi", "b.edi"]);
    }

    #[test]
    fn test_collect_inputs() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("one.edi");
        fs::write(&file, "").unwrap();
        assert_eq!(collect_inputs(&file).unwrap(), vec![file.clone()]);
        assert!(collect_inputs(&dir.path().join("missing")).is_err());
    }
}
