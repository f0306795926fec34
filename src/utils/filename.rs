use crate::utils::constants::DEFAULT_OUTPUT_FILE;
use std::path::{Path, PathBuf};

/// Merged output path inside `output_dir`
pub fn output_file_path(output_dir: &Path, file_name: Option<&str>) -> PathBuf {
    output_dir.join(file_name.unwrap_or(DEFAULT_OUTPUT_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_file() {
        let path = output_file_path(Path::new("output"), None);
        assert_eq!(path, PathBuf::from("output/merged_data.csv"));
    }

    #[test]
    fn test_named_output_file() {
        let path = output_file_path(Path::new("/data/out"), Some("ghcnd_1950.csv"));
        assert_eq!(path, PathBuf::from("/data/out/ghcnd_1950.csv"));
    }
}
