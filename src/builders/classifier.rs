use std::path::Path;

/// Derives the target key of a filesystem entry.
///
/// Directories and files without a usable extension are keyed by their base
/// name (`node_modules`, `Makefile`, `.env`). Every other file is keyed by its
/// last extension, dot included (`archive.tar.gz` gives `.gz`). The key is
/// always lowercased and trimmed.
///
/// # Arguments
/// * `path`: The entry to classify.
/// * `is_dir`: Whether the entry is a directory.
///
/// # Returns
/// The target key, possibly empty (e.g. for a root path with no file name).
pub fn target_key(path: &Path, is_dir: bool) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    // `Path::extension` already returns None for dotfiles such as `.env`.
    let key = match path.extension() {
        Some(ext) if !is_dir && !ext.is_empty() => format!(".{}", ext.to_string_lossy()),
        _ => name,
    };

    key.trim().to_lowercase()
}
