use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Returns `true` for lines that carry no pattern: comments and blank lines.
///
/// Blank covers empty strings as well as lines made only of whitespace or
/// leftover `\r` / `\n` terminators.
pub fn is_noise(line: &str) -> bool {
    line.starts_with('#') || line.trim().is_empty()
}

/// Drops comments and blanks and deduplicates what is left.
///
/// The `BTreeSet` gives the plain lexicographic order the output is written
/// in; no glob-aware ordering is attempted.
pub fn sanitize<I, S>(lines: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter(|line| !is_noise(line.as_ref()))
        .map(|line| line.as_ref().to_string())
        .collect()
}

/// Renders the final file content: one pattern per line, `\n` terminated.
pub fn render(lines: &BTreeSet<String>) -> String {
    let mut content = String::new();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    content
}

/// Merges freshly collected lines with an existing ignore file and writes the result.
pub struct IgnoreFileWriter<'a> {
    target: &'a Path,
}

impl<'a> IgnoreFileWriter<'a> {
    pub fn new(target: &'a Path) -> Self {
        Self { target }
    }

    pub fn exists(&self) -> bool {
        self.target.is_file()
    }

    /// Appends the lines of the existing file, if any, to `lines`.
    ///
    /// Existing entries are never dropped, only deduplicated later.
    pub fn absorb_existing(&self, lines: &mut Vec<String>) -> Result<()> {
        if !self.exists() {
            return Ok(());
        }

        let current = fs::read_to_string(self.target)
            .with_context(|| format!("Failed to read {}", self.target.display()))?;
        lines.extend(current.lines().map(str::to_string));
        Ok(())
    }

    /// Absorbs the existing file and returns the sanitized, sorted set.
    pub fn merge(&self, mut lines: Vec<String>) -> Result<BTreeSet<String>> {
        self.absorb_existing(&mut lines)?;
        Ok(sanitize(lines))
    }

    /// Overwrites the target with `lines`. Always `\n` line endings.
    pub fn write(&self, lines: &BTreeSet<String>) -> Result<()> {
        fs::write(self.target, render(lines))
            .with_context(|| format!("Failed to write {}", self.target.display()))
    }
}
