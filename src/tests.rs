#[cfg(test)]
mod tests {
    use crate::builders::classifier::target_key;
    use crate::builders::fetcher::{
        SnippetFetcher, SnippetOrigin, SnippetTransport, TransportResponse,
    };
    use crate::builders::filter::PathFilter;
    use crate::builders::merger::{IgnoreFileWriter, render, sanitize};
    use crate::builders::reporter::{ConsoleReporter, Level, Reporter, format_line};
    use crate::builders::validator::{ConfigValidator, StandardValidator};
    use crate::core::config::{
        ConfigEntry, ConfigFormat, SnippetConfig, SourceSpec, parse_sources,
    };
    use crate::utils::validate_target;
    use anyhow::Result;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    #[derive(Default)]
    struct RecordingReporter {
        lines: RefCell<Vec<String>>,
    }

    impl Reporter for RecordingReporter {
        fn info(&self, target: Option<&str>, message: &str) {
            self.lines.borrow_mut().push(format_line(target, message));
        }

        fn warn(&self, target: Option<&str>, message: &str) {
            self.lines.borrow_mut().push(format_line(target, message));
        }

        fn error(&self, message: &str) {
            self.lines.borrow_mut().push(message.to_string());
        }
    }

    /// Serves canned responses and counts every request.
    #[derive(Default)]
    struct StubTransport {
        responses: HashMap<String, (u16, String)>,
        calls: Cell<usize>,
    }

    impl StubTransport {
        fn with(mut self, url: &str, status: u16, body: &str) -> Self {
            self.responses
                .insert(url.to_string(), (status, body.to_string()));
            self
        }
    }

    impl SnippetTransport for StubTransport {
        fn get(&self, url: &str) -> Result<TransportResponse> {
            self.calls.set(self.calls.get() + 1);
            match self.responses.get(url) {
                Some((status, body)) => Ok(TransportResponse {
                    status: *status,
                    body: body.clone(),
                }),
                None => anyhow::bail!("connection refused"),
            }
        }
    }

    // ---- classifier ----

    #[test]
    fn test_directory_is_keyed_by_name() {
        assert_eq!(target_key(Path::new("proj/Node_Modules"), true), "node_modules");
        assert_eq!(target_key(Path::new("proj/lib.rs"), true), "lib.rs");
    }

    #[test]
    fn test_extensionless_file_is_keyed_by_name() {
        assert_eq!(target_key(Path::new("proj/Makefile"), false), "makefile");
        assert_eq!(target_key(Path::new("proj/trailing."), false), "trailing.");
    }

    #[test]
    fn test_last_extension_wins() {
        assert_eq!(target_key(Path::new("report.v2.csv"), false), ".csv");
        assert_eq!(target_key(Path::new("archive.tar.GZ"), false), ".gz");
    }

    #[test]
    fn test_dotfile_without_extension_uses_whole_name() {
        assert_eq!(target_key(Path::new("proj/.env"), false), ".env");
        assert_eq!(target_key(Path::new("proj/.eslintrc.json"), false), ".json");
    }

    // ---- filter ----

    #[test]
    fn test_filter_skips_excluded_ancestors() {
        let root = Path::new("/work/proj");
        let output = root.join(".gitignore");
        let filter = PathFilter::new(root, &output);

        assert!(filter.should_skip(&root.join("node_modules/lodash/index.js")));
        assert!(filter.should_skip(&root.join("src/build/out.o")));
        assert!(filter.should_skip(&root.join(".git/HEAD")));
        assert!(filter.should_skip(&root.join(".git")));
        assert!(filter.should_skip(&output));

        assert!(!filter.should_skip(&root.join("node_modules")));
        assert!(!filter.should_skip(&root.join("src/main.py")));
        assert!(!filter.should_skip(&root.join("sub/.gitignore")));
    }

    #[test]
    fn test_filter_ignores_ancestors_above_root() {
        let root = Path::new("/home/me/build/proj");
        let output = root.join(".gitignore");
        let filter = PathFilter::new(root, &output);

        assert!(!filter.should_skip(&root.join("src/app.py")));
    }

    // ---- config ----

    #[test]
    fn test_alias_groups_expand_to_independent_entries() {
        let sources = parse_sources(
            r#"{ "py|PYC": "https://example.com/Python.gitignore", "node_modules": null }"#,
            ConfigFormat::Json,
        )
        .unwrap();
        let mut config = SnippetConfig::from_sources(&sources);

        assert_eq!(config.len(), 3);
        assert_eq!(
            config.get("pyc").unwrap().url.as_deref(),
            Some("https://example.com/Python.gitignore")
        );
        assert!(config.get("node_modules").unwrap().url.is_none());

        config.get_mut("py").unwrap().cache.push("*.pyc".to_string());
        assert!(config.get("pyc").unwrap().cache.is_empty());
    }

    #[test]
    fn test_detailed_entry_seeds_cache() {
        let sources = parse_sources(
            r#"{ ".py": { "url": "https://example.com/py", "cache": ["__pycache__/"] } }"#,
            ConfigFormat::Json,
        )
        .unwrap();
        let config = SnippetConfig::from_sources(&sources);

        assert_eq!(config.get(".py").unwrap().cache, vec!["__pycache__/"]);
    }

    #[test]
    fn test_toml_and_yaml_configs() {
        let toml = parse_sources(
            "\".rs\" = \"https://example.com/Rust.gitignore\"\n",
            ConfigFormat::Toml,
        )
        .unwrap();
        assert_eq!(
            toml.get(".rs").unwrap().as_ref().and_then(SourceSpec::url),
            Some("https://example.com/Rust.gitignore")
        );

        let yaml = parse_sources(".go|go.mod: https://example.com/Go.gitignore\n", ConfigFormat::Yaml)
            .unwrap();
        assert_eq!(SnippetConfig::from_sources(&yaml).len(), 2);
    }

    #[test]
    fn test_config_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("config.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("config.TOML")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("config.yml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("config")), ConfigFormat::Json);
    }

    // ---- validator ----

    #[test]
    fn test_validator_reports_bad_urls_and_conflicts() {
        let sources = parse_sources(
            r#"{
                ".py": "https://example.com/a",
                ".py|.pyc": "https://example.com/b",
                "bad": "ftp://example.com/c",
                "missing": null,
                "seeded": { "cache": ["x"] },
                "a||b": "https://example.com/d"
            }"#,
            ConfigFormat::Json,
        )
        .unwrap();
        let issues = StandardValidator::new().validate_config(&sources);

        assert!(issues.iter().any(|i| i.contains("non-HTTP URL")));
        assert!(issues.iter().any(|i| i == "Key 'missing' has no URL"));
        assert!(issues.iter().any(|i| i.contains("Alias '.py'")));
        assert!(issues.iter().any(|i| i.contains("empty alias")));
        assert!(!issues.iter().any(|i| i.contains("'seeded'")));
    }

    #[test]
    fn test_later_group_in_file_wins_an_alias() {
        let sources = parse_sources(
            r#"{ "z|.py": "https://example.com/A", ".py": "https://example.com/B" }"#,
            ConfigFormat::Json,
        )
        .unwrap();
        let config = SnippetConfig::from_sources(&sources);

        assert_eq!(
            config.get(".py").unwrap().url.as_deref(),
            Some("https://example.com/B")
        );
        assert_eq!(config.get("z").unwrap().url.as_deref(), Some("https://example.com/A"));

        let issues = StandardValidator::new().validate_config(&sources);
        assert_eq!(
            issues,
            vec![
                "Alias '.py' is defined by 'z|.py' and '.py' with different URLs; the later '.py' is used"
            ]
        );
    }

    #[test]
    fn test_toml_config_keeps_file_order() {
        let sources = parse_sources(
            "\"z|.rs\" = \"https://example.com/A\"\n\".rs\" = \"https://example.com/B\"\n",
            ConfigFormat::Toml,
        )
        .unwrap();

        assert_eq!(
            sources.keys().collect::<Vec<_>>(),
            vec!["z|.rs", ".rs"]
        );
        assert_eq!(
            SnippetConfig::from_sources(&sources).get(".rs").unwrap().url.as_deref(),
            Some("https://example.com/B")
        );
    }

    // ---- fetcher ----

    #[test]
    fn test_second_fetch_is_a_cache_hit() {
        let transport = StubTransport::default().with("https://example.com/py", 200, "# py\n*.pyc\r\n__pycache__/\n");
        let reporter = RecordingReporter::default();
        let fetcher = SnippetFetcher::new(&transport, &reporter);
        let mut config = SnippetConfig::new();
        config.insert(".py", ConfigEntry::new("https://example.com/py"));

        let first = fetcher.fetch(".py", &mut config);
        let second = fetcher.fetch(".py", &mut config);

        assert_eq!(first.origin, SnippetOrigin::Network);
        assert_eq!(first.lines, vec!["# py", "*.pyc", "__pycache__/"]);
        assert_eq!(second.origin, SnippetOrigin::Cache);
        assert_eq!(second.lines, first.lines);
        assert_eq!(transport.calls.get(), 1);
        assert!(
            reporter
                .lines
                .borrow()
                .contains(&"[.py] Using cached gitignore data...".to_string())
        );
    }

    #[test]
    fn test_fetch_failures_are_soft() {
        let transport = StubTransport::default().with("https://example.com/gone", 404, "");
        let reporter = RecordingReporter::default();
        let fetcher = SnippetFetcher::new(&transport, &reporter);
        let mut config = SnippetConfig::new();
        config.insert("gone", ConfigEntry::new("https://example.com/gone"));
        config.insert("offline", ConfigEntry::new("https://unreachable.invalid/"));
        config.insert("nourl", ConfigEntry::default());

        let gone = fetcher.fetch("gone", &mut config);
        let offline = fetcher.fetch("offline", &mut config);
        let nourl = fetcher.fetch("nourl", &mut config);
        let unknown = fetcher.fetch("unknown", &mut config);

        assert_eq!(gone.origin, SnippetOrigin::Failed);
        assert_eq!(offline.origin, SnippetOrigin::Failed);
        assert_eq!(nourl.origin, SnippetOrigin::Failed);
        assert_eq!(unknown.origin, SnippetOrigin::NotConfigured);
        assert!(gone.lines.is_empty() && offline.lines.is_empty() && nourl.lines.is_empty());
        assert!(config.get("gone").unwrap().cache.is_empty());
        // No request for the entry without URL nor for the unknown key.
        assert_eq!(transport.calls.get(), 2);
        assert!(
            reporter
                .lines
                .borrow()
                .iter()
                .any(|l| l.starts_with("[gone] ") && l.ends_with("Status code: 404"))
        );
    }

    // ---- merger ----

    #[test]
    fn test_sanitize_drops_comments_blanks_and_duplicates() {
        let lines = sanitize(["*.log", "# comment", "", "*.log", "*.tmp", "\r", "  "]);
        assert_eq!(lines.into_iter().collect::<Vec<_>>(), vec!["*.log", "*.tmp"]);
    }

    #[test]
    fn test_merge_keeps_existing_entries() {
        let dir = tempdir().unwrap();
        let target = dir.path().join(".gitignore");
        fs::write(&target, "*.log\n# comment\n\n").unwrap();

        let writer = IgnoreFileWriter::new(&target);
        let merged = writer
            .merge(vec!["*.log".to_string(), "*.tmp".to_string()])
            .unwrap();
        writer.write(&merged).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "*.log\n*.tmp\n");
    }

    #[test]
    fn test_render_sorts_lexicographically() {
        let lines = sanitize(["b", "B", "a/", "!keep", "*.o"]);
        assert_eq!(render(&lines), "!keep\n*.o\nB\na/\nb\n");
        assert_eq!(render(&sanitize(Vec::<String>::new())), "");
    }

    // ---- arguments ----

    #[test]
    fn test_validate_target() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let err = validate_target(&[]).unwrap_err();
        assert_eq!(err.to_string(), "You must inform the target folder.");
        let err = validate_target(&[dir.path().join("nope")]).unwrap_err();
        assert_eq!(err.to_string(), "The target folder does not exist.");
        let err = validate_target(&[file]).unwrap_err();
        assert_eq!(err.to_string(), "The target folder is not a directory.");
        assert_eq!(
            validate_target(&[dir.path().to_path_buf()]).unwrap(),
            PathBuf::from(dir.path())
        );
    }

    #[test]
    fn test_validate_target_rejects_extra_arguments() {
        let dir = tempdir().unwrap();
        let targets = [dir.path().to_path_buf(), dir.path().to_path_buf()];

        let err = validate_target(&targets).unwrap_err();
        assert_eq!(
            err.to_string(),
            "You need to pass only one argument: the target folder."
        );
    }

    // ---- reporter ----

    #[test]
    fn test_quiet_console_drops_only_info_lines() {
        let quiet = ConsoleReporter::new(true);

        assert!(quiet.render(Level::Info, Some(".py"), "Fetching gitignore data...").is_none());
        let warn = quiet
            .render(Level::Warn, Some(".py"), "Status code: 404")
            .unwrap();
        assert!(warn.contains("[.py]") && warn.contains("Status code: 404"));
        let error = quiet
            .render(Level::Error, None, "The target folder does not exist.")
            .unwrap();
        assert!(error.contains("The target folder does not exist."));
    }

    #[test]
    fn test_console_info_line_carries_target_prefix() {
        let console = ConsoleReporter::new(false);

        let with_target = console
            .render(Level::Info, Some("node_modules"), "Adding data...")
            .unwrap();
        assert!(with_target.contains("[node_modules]"));
        assert!(with_target.ends_with("Adding data..."));

        let bare = console.render(Level::Info, None, "Scanning files...").unwrap();
        assert_eq!(bare, "Scanning files...");
    }
}
