//! File storage for submitted proof images.
//!
//! Images land under `~/.config/taskproof/proofs/` with a uuid-prefixed
//! filename; the task record keeps the path, classification uses the
//! raw bytes.

use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Directory holding stored proof images.
pub fn proofs_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let dir = super::data_dir()?.join("proofs");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Store proof image bytes, returning the path written.
pub fn store(bytes: &[u8], original_name: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    store_in(&proofs_dir()?, bytes, original_name)
}

/// Store into an explicit directory (tests use a temp dir).
pub fn store_in(
    dir: &Path,
    bytes: &[u8],
    original_name: &str,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let name = sanitize(original_name);
    let path = dir.join(format!("{}_{}", Uuid::new_v4(), name));
    std::fs::write(&path, bytes)?;
    Ok(path)
}

/// Read stored proof bytes back.
pub fn load(path: &Path) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    Ok(std::fs::read(path)?)
}

// Keep only a safe subset of the user-supplied filename.
fn sanitize(name: &str) -> String {
    let cleaned: String = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("proof")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "proof".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = vec![0xff, 0xd8, 0xff, 0xe0, 1, 2, 3];
        let path = store_in(dir.path(), &bytes, "run.jpg").unwrap();
        assert!(path.starts_with(dir.path()));
        assert!(path.to_string_lossy().ends_with("run.jpg"));
        assert_eq!(load(&path).unwrap(), bytes);
    }

    #[test]
    fn filenames_are_sanitized() {
        assert_eq!(sanitize("../../etc/passwd"), "passwd");
        assert_eq!(sanitize("my photo (1).jpg"), "my_photo__1_.jpg");
        assert_eq!(sanitize(""), "proof");
    }

    #[test]
    fn stored_names_are_unique_per_call() {
        let dir = tempfile::tempdir().unwrap();
        let a = store_in(dir.path(), b"x", "p.jpg").unwrap();
        let b = store_in(dir.path(), b"x", "p.jpg").unwrap();
        assert_ne!(a, b);
    }
}
