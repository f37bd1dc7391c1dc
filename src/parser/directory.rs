use crate::registry::FormatId;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Find files in a directory whose detected format can reach `target`.
/// If recursive is true, use walkdir; otherwise list the top level only.
pub fn find_convertible_files(
    dir: &Path,
    recursive: bool,
    target: FormatId,
) -> Result<Vec<(PathBuf, FormatId)>, std::io::Error> {
    let mut files = Vec::new();

    if recursive {
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if let Some(source) = crate::parser::filter::convertible_format(path, target) {
                files.push((path.to_path_buf(), source));
            }
        }
    } else {
        let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<_, _>>()?;
        entries.sort();
        for path in entries {
            if let Some(source) = crate::parser::filter::convertible_format(&path, target) {
                files.push((path, source));
            }
        }
    }

    Ok(files)
}
