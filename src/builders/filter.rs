use std::path::{Component, Path};

/// Name of the version-control metadata directory.
pub const GIT_DIR: &str = ".git";

/// Directories whose contents are never scanned.
pub const EXCLUDED_DIRS: &[&str] = &[
    GIT_DIR,
    "node_modules",
    "venv",
    "env",
    "build",
    "dist",
    "bin",
    ".idea",
    ".vs",
    ".vscode",
];

/// Decides which entries of the scanned tree take part in type detection.
pub struct PathFilter<'a> {
    root: &'a Path,
    output: &'a Path,
}

impl<'a> PathFilter<'a> {
    /// # Arguments
    /// * `root`: The scanned tree root. Ancestors above it are never inspected.
    /// * `output`: The ignore file being generated; it is never read as input.
    pub fn new(root: &'a Path, output: &'a Path) -> Self {
        Self { root, output }
    }

    /// Returns `true` when `path` must be left out of the scan.
    ///
    /// An entry is skipped if it is the `.git` directory, if it sits anywhere
    /// below an excluded directory, or if it is the output file itself. An
    /// excluded directory that is not `.git` is *not* skipped: its own name is
    /// still a valid target key.
    pub fn should_skip(&self, path: &Path) -> bool {
        if path == self.output {
            return true;
        }

        if path.file_name().is_some_and(|name| name == GIT_DIR) {
            return true;
        }

        let relative = path.strip_prefix(self.root).unwrap_or(path);
        relative
            .parent()
            .into_iter()
            .flat_map(Path::components)
            .any(|component| match component {
                Component::Normal(name) => name
                    .to_str()
                    .is_some_and(|name| EXCLUDED_DIRS.contains(&name)),
                _ => false,
            })
    }

    /// Returns `true` when the walker must not descend into the directory at `path`.
    pub fn is_excluded_dir(path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| EXCLUDED_DIRS.contains(&name))
    }
}
