use std::fs;
use std::path::{Path, PathBuf};

use crate::config::error::ConfigError;

const CAPTURE_EXTENSION: &str = "wav";

/// Display/model name for a capture: the file name without its directory
/// and without a trailing `.wav`.
pub fn capture_base_name(file: &str) -> String {
    let name = file.rsplit(['/', '\\']).next().unwrap_or(file);
    let ext = CAPTURE_EXTENSION.len() + 1;
    match name.len().checked_sub(ext) {
        Some(cut) if name.is_char_boundary(cut)
            && name[cut..].starts_with('.')
            && name[cut + 1..].eq_ignore_ascii_case(CAPTURE_EXTENSION) => name[..cut].to_owned(),
        _ => name.to_owned(),
    }
}

/// Lists every `.wav` file below `folder`, as '/'-separated paths relative
/// to it, sorted.
pub fn scan_captures(folder: &Path) -> Result<Vec<String>, ConfigError> {
    let mut found = Vec::new();
    walk(folder, folder, &mut found)?;
    found.sort();
    Ok(found)
}

fn walk(root: &Path, dir: &Path, found: &mut Vec<String>) -> Result<(), ConfigError> {
    let scan_err = |source| ConfigError::Scan { path: dir.to_path_buf(), source };
    for entry in fs::read_dir(dir).map_err(scan_err)? {
        let path = entry.map_err(scan_err)?.path();
        if path.is_dir() {
            walk(root, &path, found)?;
        } else if is_capture(&path) {
            if let Ok(relative) = path.strip_prefix(root) {
                found.push(to_slash(relative));
            }
        }
    }
    Ok(())
}

fn is_capture(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(CAPTURE_EXTENSION))
}

fn to_slash(relative: &Path) -> String {
    relative.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Joins a capture name (as stored in the config) onto its folder.
pub fn capture_path(folder: &Path, file: &str) -> PathBuf {
    file.split('/').fold(folder.to_path_buf(), |acc, part| acc.join(part))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_strips_directory_and_extension() {
        assert_eq!(capture_base_name("ampA.wav"), "ampA");
        assert_eq!(capture_base_name("clean/ampB.WAV"), "ampB");
        assert_eq!(capture_base_name("C:\\caps\\ampC.wav"), "ampC");
    }

    #[test]
    fn base_name_keeps_other_extensions() {
        assert_eq!(capture_base_name("notes.txt"), "notes.txt");
        assert_eq!(capture_base_name("wav"), "wav");
        assert_eq!(capture_base_name("my.wav.bak"), "my.wav.bak");
    }

    #[test]
    fn scan_finds_nested_wavs_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("crunch")).unwrap();
        fs::write(dir.path().join("b.wav"), b"").unwrap();
        fs::write(dir.path().join("crunch/a.WAV"), b"").unwrap();
        fs::write(dir.path().join("readme.md"), b"").unwrap();

        let found = scan_captures(dir.path()).unwrap();
        assert_eq!(found, vec!["b.wav".to_owned(), "crunch/a.WAV".to_owned()]);
        assert!(capture_path(dir.path(), &found[1]).is_file());
    }
}
