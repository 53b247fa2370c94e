use std::path::Path;

use meme_studio_application::{ApplicationError, FileScanSummary, FileScanner, ScannedFile};
use meme_studio_domain::detect_template_image;
use walkdir::WalkDir;

#[derive(Debug, Default)]
pub struct WalkdirFileScanner;

impl FileScanner for WalkdirFileScanner {
    fn scan_images(&self, folder: &str) -> Result<FileScanSummary, ApplicationError> {
        let folder_path = Path::new(folder);
        if !folder_path.is_dir() {
            return Err(ApplicationError::InvalidInput(format!(
                "folder does not exist or is not a directory: {folder}"
            )));
        }

        let mut summary = FileScanSummary::default();
        let entries = WalkDir::new(folder_path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok);

        for entry in entries {
            if !entry.file_type().is_file() {
                continue;
            }

            summary.scanned_files += 1;
            let file_path = entry.path();
            if !detect_template_image(file_path) {
                continue;
            }

            let canonical_path = file_path
                .canonicalize()
                .map_err(|error| ApplicationError::Io(error.to_string()))?;
            let file_stem = file_path
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
                .unwrap_or_default();

            summary.supported_files += 1;
            summary.files.push(ScannedFile {
                canonical_path,
                file_stem,
            });
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn counts_supported_images_recursively() {
        let dir = TempDir::new().expect("tempdir");
        fs::create_dir(dir.path().join("nested")).expect("mkdir");
        fs::write(dir.path().join("drake.jpg"), b"x").expect("write");
        fs::write(dir.path().join("nested").join("doge.PNG"), b"x").expect("write");
        fs::write(dir.path().join("notes.txt"), b"x").expect("write");

        let summary = WalkdirFileScanner
            .scan_images(&dir.path().to_string_lossy())
            .expect("scan");

        assert_eq!(summary.scanned_files, 3);
        assert_eq!(summary.supported_files, 2);
        let stems: Vec<_> = summary.files.iter().map(|file| file.file_stem.as_str()).collect();
        assert_eq!(stems, vec!["drake", "doge"]);
        assert!(summary.files.iter().all(|file| file.canonical_path.is_absolute()));
    }

    #[test]
    fn missing_folder_is_invalid_input() {
        assert!(matches!(
            WalkdirFileScanner.scan_images("/definitely/not/here"),
            Err(ApplicationError::InvalidInput(_))
        ));
    }
}
