use colored::Colorize;

/// The `Reporter` trait is the line-oriented log sink used by every stage of
/// the generator.
///
/// Each call takes the target key it relates to explicitly. `Some(key)` prefixes
/// the line with `[key]`, `None` prints the bare message. There is no
/// process-wide "current target": the engine passes the key it is working on.
pub trait Reporter {
    /// Progress information. May be silenced.
    fn info(&self, target: Option<&str>, message: &str);

    /// A soft failure or a configuration issue. The run carries on.
    fn warn(&self, target: Option<&str>, message: &str);

    /// A fatal failure. Always printed.
    fn error(&self, message: &str);
}

/// Formats a log line without any colouring.
///
/// # Arguments
/// * `target`: The target key the message relates to, if any.
/// * `message`: The message itself.
///
/// # Returns
/// `"[target] message"` or just `"message"`.
pub fn format_line(target: Option<&str>, message: &str) -> String {
    match target {
        Some(target) => format!("[{target}] {message}"),
        None => message.to_string(),
    }
}

/// Severity of a console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// A `Reporter` that prints to standard output.
///
/// Colours are applied with `colored`, which already honours `NO_COLOR`.
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    /// Constructs a new `ConsoleReporter`. With `quiet` set, `info` lines are dropped.
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    fn prefix(target: Option<&str>) -> String {
        match target {
            Some(target) => format!("{} ", format!("[{target}]").cyan().bold()),
            None => String::new(),
        }
    }

    /// Builds the coloured line printed for a message.
    ///
    /// # Arguments
    /// * `level`: Decides the colour, and whether `quiet` drops the line.
    /// * `target`: The target key prefix, if any. Errors never carry one.
    /// * `message`: The message itself.
    ///
    /// # Returns
    /// `None` when the line is suppressed, i.e. an `Info` line in quiet mode.
    pub fn render(&self, level: Level, target: Option<&str>, message: &str) -> Option<String> {
        match level {
            Level::Info if self.quiet => None,
            Level::Info => Some(format!("{}{}", Self::prefix(target), message)),
            Level::Warn => Some(format!("{}{}", Self::prefix(target), message.yellow())),
            Level::Error => Some(message.red().bold().to_string()),
        }
    }

    fn emit(&self, level: Level, target: Option<&str>, message: &str) {
        if let Some(line) = self.render(level, target, message) {
            println!("{line}");
        }
    }
}

impl Reporter for ConsoleReporter {
    fn info(&self, target: Option<&str>, message: &str) {
        self.emit(Level::Info, target, message);
    }

    fn warn(&self, target: Option<&str>, message: &str) {
        self.emit(Level::Warn, target, message);
    }

    fn error(&self, message: &str) {
        self.emit(Level::Error, None, message);
    }
}
