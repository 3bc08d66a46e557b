//! Photo library access
//!
//! The library is a configured directory of image files. Listing doubles
//! as the authorization check: a directory that cannot be read is the
//! denied-permission case and surfaces as a blocking alert upstream.

use std::fs;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// List the image files in the photo directory, sorted by name
pub fn list_photos(dir: &Path) -> Result<Vec<PathBuf>, String> {
    let entries = fs::read_dir(dir)
        .map_err(|e| format!("Photo library not accessible: {}", e))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_image_file(path))
        .collect();

    files.sort();
    Ok(files)
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("wall.jpg")));
        assert!(is_image_file(Path::new("wall.JPEG")));
        assert!(is_image_file(Path::new("wall.Png")));
        assert!(!is_image_file(Path::new("wall.txt")));
        assert!(!is_image_file(Path::new("wall")));
    }

    #[test]
    fn test_list_photos_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.png"), b"x").unwrap();
        fs::write(dir.path().join("a.jpg"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::create_dir(dir.path().join("sub.jpg")).unwrap();

        let files = list_photos(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["a.jpg", "b.png"]);
    }

    #[test]
    fn test_list_photos_unreadable_dir() {
        let err = list_photos(Path::new("/nonexistent/photos")).unwrap_err();
        assert!(err.contains("not accessible"));
    }
}
