use std::collections::HashMap;

use crate::core::config::{ALIAS_SEPARATOR, SourceMap, SourceSpec, split_aliases};

/// The `ConfigValidator` trait defines the public interface for checking a
/// loaded config before it is used.
///
/// Issues are never fatal. The generator logs them as warnings and the
/// affected keys simply contribute nothing, or the wrong snippet, to the output.
pub trait ConfigValidator {
    /// Validates every group of the config file and returns one message per issue.
    fn validate_config(&self, sources: &SourceMap) -> Vec<String>;

    /// Validates a single group (`key` is the raw, unexpanded config key).
    fn validate_source(&self, key: &str, spec: Option<&SourceSpec>) -> Vec<String>;
}

/// The `StandardValidator` performs the checks the generator relies on:
/// every alias has a fetchable URL and no alias is claimed by two groups
/// pointing at different URLs.
pub struct StandardValidator;

impl StandardValidator {
    /// Creates a new instance of `StandardValidator`.
    pub fn new() -> Self {
        Self
    }

    /// Finds aliases defined by more than one group with different URLs.
    ///
    /// Groups are visited in file order, the same order used for expansion,
    /// so the message names the group that actually wins: the later one.
    fn check_alias_conflicts(&self, sources: &SourceMap) -> Vec<String> {
        let mut warnings = Vec::new();
        let mut seen: HashMap<String, (&str, Option<&str>)> = HashMap::new();

        for (group, spec) in sources {
            let url = spec.as_ref().and_then(SourceSpec::url);
            for alias in split_aliases(group) {
                if let Some((previous_group, previous_url)) = seen.get(&alias)
                    && *previous_url != url
                {
                    warnings.push(format!(
                        "Alias '{alias}' is defined by '{previous_group}' and '{group}' with different URLs; the later '{group}' is used"
                    ));
                }
                seen.insert(alias, (group.as_str(), url));
            }
        }

        warnings
    }
}

impl Default for StandardValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidator for StandardValidator {
    fn validate_config(&self, sources: &SourceMap) -> Vec<String> {
        let mut issues = Vec::new();

        for (key, spec) in sources {
            issues.extend(self.validate_source(key, spec.as_ref()));
        }

        issues.extend(self.check_alias_conflicts(sources));
        issues
    }

    fn validate_source(&self, key: &str, spec: Option<&SourceSpec>) -> Vec<String> {
        let mut issues = Vec::new();

        if key.split(ALIAS_SEPARATOR).any(|alias| alias.trim().is_empty()) {
            issues.push(format!("Key '{key}' contains an empty alias"));
        }

        match spec.and_then(SourceSpec::url).map(str::trim) {
            None => {
                // A pre-seeded cache makes the URL unnecessary.
                if spec.is_none_or(|s| s.cache().is_empty()) {
                    issues.push(format!("Key '{key}' has no URL"));
                }
            }
            Some("") => issues.push(format!("Key '{key}' has an empty URL")),
            Some(url) if !url.starts_with("http://") && !url.starts_with("https://") => {
                issues.push(format!("Key '{key}' has a non-HTTP URL: {url}"));
            }
            Some(_) => {}
        }

        issues
    }
}
