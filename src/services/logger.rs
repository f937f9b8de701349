use crate::constants::env::LOG_LEVEL;
use crate::services::config::Environment;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("error") => LogLevel::Error,
            Some("warn") | Some("warning") => LogLevel::Warn,
            Some("debug") | Some("trace") => LogLevel::Debug,
            _ => LogLevel::Info,
        }
    }

    fn label(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// Leveled stderr logger. stdout belongs to the protocol.
#[derive(Debug, Clone)]
pub struct Logger {
    context: String,
    level: LogLevel,
}

impl Logger {
    /// Info level. `from_environment` honours `LOG_LEVEL`.
    pub fn new(context: &str) -> Self {
        Self {
            context: context.to_string(),
            level: LogLevel::Info,
        }
    }

    pub fn from_environment(context: &str, env: &Environment) -> Self {
        Self {
            context: context.to_string(),
            level: LogLevel::parse(env.get(LOG_LEVEL)),
        }
    }

    pub fn child(&self, suffix: &str) -> Self {
        let context = if suffix.is_empty() {
            self.context.clone()
        } else {
            format!("{}:{}", self.context, suffix)
        };
        Self {
            context,
            level: self.level,
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    fn log(&self, level: LogLevel, message: &str, meta: Option<&Value>) {
        if level > self.level {
            return;
        }
        let meta_suffix = meta
            .filter(|m| !m.is_null())
            .map(|m| format!(" {}", m))
            .unwrap_or_default();
        eprintln!(
            "[{}] {} [{}] {}{}",
            chrono::Utc::now().to_rfc3339(),
            level.label(),
            self.context,
            message,
            meta_suffix
        );
    }

    pub fn error(&self, message: &str, meta: Option<&Value>) {
        self.log(LogLevel::Error, message, meta);
    }

    pub fn warn(&self, message: &str, meta: Option<&Value>) {
        self.log(LogLevel::Warn, message, meta);
    }

    pub fn info(&self, message: &str, meta: Option<&Value>) {
        self.log(LogLevel::Info, message, meta);
    }

    pub fn debug(&self, message: &str, meta: Option<&Value>) {
        self.log(LogLevel::Debug, message, meta);
    }
}
