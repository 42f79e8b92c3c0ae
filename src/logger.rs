use chrono::{DateTime, Utc};
use colored::*;
use log::{Level, LevelFilter, Metadata, Record};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::future::Future;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;

static BEAUTIFUL_LOGGER: Lazy<BeautifulLogger> = Lazy::new(BeautifulLogger::new);

tokio::task_local! {
    static REQUEST_ID: String;
}

pub fn init_with_config(config: LoggerConfig) -> Result<(), String> {
    let filter = config.min_level.filter();
    BEAUTIFUL_LOGGER.update_config(config)?;

    log::set_logger(&*BEAUTIFUL_LOGGER).map_err(|e| format!("Failed to set logger: {:?}", e))?;
    log::set_max_level(filter);
    Ok(())
}

/// Drive `fut` with `request_id` attached to every line it logs, including
/// lines from the provider client and timers it creates.
pub async fn with_request_id<F: Future>(request_id: String, fut: F) -> F::Output {
    REQUEST_ID.scope(request_id, fut).await
}

fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|id| id.clone()).ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn color(&self) -> Color {
        match self {
            LogLevel::Trace => Color::Cyan,
            LogLevel::Debug => Color::Blue,
            LogLevel::Info => Color::Green,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
        }
    }

    fn emoji(&self) -> &'static str {
        match self {
            LogLevel::Trace => "🔍",
            LogLevel::Debug => "🐛",
            LogLevel::Info => "💡",
            LogLevel::Warn => "⚠️",
            LogLevel::Error => "❌",
        }
    }

    pub fn filter(&self) -> LevelFilter {
        match self {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Trace => LogLevel::Trace,
            Level::Debug => LogLevel::Debug,
            Level::Info => LogLevel::Info,
            Level::Warn => LogLevel::Warn,
            Level::Error => LogLevel::Error,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

/// One timestamped log line, serialized as-is in JSON mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub module: String,
    pub message: String,
    pub location: String,
}

impl LogEntry {
    fn from_record(record: &Record) -> Self {
        Self {
            timestamp: Utc::now(),
            level: record.level().into(),
            request_id: current_request_id(),
            module: record.module_path().unwrap_or("unknown").to_string(),
            message: record.args().to_string(),
            location: format!(
                "{}:{}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0)
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub colors: bool,
    pub emojis: bool,
    pub show_module: bool,
    pub show_location: bool,
    pub timestamp_format: String,
    pub json: bool,
    pub log_file: Option<PathBuf>,
    pub prefix: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            colors: true,
            emojis: true,
            show_module: true,
            show_location: true,
            timestamp_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            json: false,
            log_file: None,
            prefix: None,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Colored console output down to debug level.
    pub fn development() -> Self {
        Self {
            min_level: LogLevel::Debug,
            ..Default::default()
        }
    }

    /// One JSON object per line, no colors.
    pub fn production() -> Self {
        Self {
            colors: false,
            emojis: false,
            json: true,
            ..Default::default()
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.colors = enabled;
        self
    }

    pub fn with_file_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }

    /// Reads `LOG_FORMAT`, `LOG_LEVEL` and `LOG_FILE`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let config = match lookup("LOG_FORMAT").as_deref() {
            Some("json") => Self::production(),
            _ => Self::development().with_level(LogLevel::Info),
        };
        let config = match lookup("LOG_LEVEL").and_then(|l| l.parse::<LogLevel>().ok()) {
            Some(level) => config.with_level(level),
            None => config,
        };
        match lookup("LOG_FILE").filter(|path| !path.is_empty()) {
            Some(path) => config.with_file_output(path),
            None => config,
        }
    }
}

pub struct BeautifulLogger {
    config: Mutex<LoggerConfig>,
    log_file: Mutex<Option<File>>,
}

impl Default for BeautifulLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl BeautifulLogger {
    pub fn new() -> Self {
        Self {
            config: Mutex::new(LoggerConfig::default()),
            log_file: Mutex::new(None),
        }
    }

    pub fn update_config(&self, config: LoggerConfig) -> Result<(), String> {
        let file = match &config.log_file {
            Some(path) => Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| format!("Failed to open log file {}: {}", path.display(), e))?,
            ),
            None => None,
        };

        if let Ok(mut log_file) = self.log_file.lock() {
            *log_file = file;
        }
        if let Ok(mut current) = self.config.lock() {
            *current = config;
        }
        Ok(())
    }

    fn render(entry: &LogEntry, config: &LoggerConfig) -> String {
        if config.json {
            return serde_json::to_string(entry).unwrap_or_default();
        }

        let dim = |text: String| {
            if config.colors {
                text.bright_black().to_string()
            } else {
                text
            }
        };

        let mut parts = Vec::new();
        if let Some(prefix) = &config.prefix {
            let prefix = if config.colors {
                prefix.bright_white().bold().to_string()
            } else {
                prefix.clone()
            };
            parts.push(format!("[{}]", prefix));
        }

        parts.push(dim(entry.timestamp.format(&config.timestamp_format).to_string()));

        let level = if config.emojis {
            format!("{} {}", entry.level.emoji(), entry.level)
        } else {
            entry.level.to_string()
        };
        let level = if config.colors {
            level.color(entry.level.color()).bold().to_string()
        } else {
            level
        };
        parts.push(format!("[{}]", level));

        if let Some(id) = &entry.request_id {
            parts.push(dim(format!("[req:{}]", id)));
        }

        let message = if config.colors {
            entry.message.white().bold().to_string()
        } else {
            entry.message.clone()
        };
        if config.show_module && !entry.module.is_empty() {
            let module = if config.colors {
                entry.module.bright_blue().to_string()
            } else {
                entry.module.clone()
            };
            parts.push(format!("{}::{}", module, message));
        } else {
            parts.push(message);
        }

        if config.show_location {
            parts.push(dim(format!("({})", entry.location)));
        }

        parts.join(" ")
    }

    fn append_to_file(&self, line: &str) {
        if let Ok(mut guard) = self.log_file.lock() {
            if let Some(file) = guard.as_mut() {
                let _ = writeln!(file, "{}", line);
            }
        }
    }
}

impl log::Log for BeautifulLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        match self.config.lock() {
            Ok(config) => metadata.level() <= config.min_level.filter(),
            Err(_) => true,
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = match self.config.lock() {
            Ok(config) => Self::render(&LogEntry::from_record(record), &config),
            Err(_) => return,
        };
        println!("{}", line);
        self.append_to_file(&line);
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
        if let Ok(mut guard) = self.log_file.lock() {
            if let Some(file) = guard.as_mut() {
                let _ = file.flush();
            }
        }
    }
}

/// Logs how long it lived when dropped.
pub struct Timer {
    start: Instant,
    name: String,
}

impl Drop for Timer {
    fn drop(&mut self) {
        log::info!(
            "⏱️  Timer '{}' completed in {}ms",
            self.name,
            self.start.elapsed().as_millis()
        );
    }
}

pub fn timer(name: &str) -> Timer {
    log::debug!("⏱️  Starting timer: {}", name);
    Timer {
        start: Instant::now(),
        name: name.to_string(),
    }
}

/// Log application startup information
pub fn log_startup_info(app_name: &str, version: &str, host: &str, port: u16) {
    log::info!("🚀 Starting {} v{}", app_name, version);
    log::info!("🌐 Server will run on http://{}:{}", host, port);
    log::info!("📝 Logger initialized successfully");
}

/// Log configuration details. The provider key is reported by presence only.
pub fn log_config_info(config: &crate::config::Config) {
    log::info!("⚙️  Configuration loaded:");
    log::info!("   Bind: {}:{}", config.host, config.port);
    log::info!("   Provider: {}", config.provider.base_url);
    log::info!("   Model: {}", config.provider.model);
    log::info!(
        "   API key: {}",
        if config.provider.api_key.is_some() { "✅" } else { "❌" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn entry(request_id: Option<&str>) -> LogEntry {
        LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::Warn,
            request_id: request_id.map(String::from),
            module: "rgen_studio::server".to_string(),
            message: "provider slow".to_string(),
            location: "src/server/handlers.rs:10".to_string(),
        }
    }

    fn plain() -> LoggerConfig {
        LoggerConfig {
            emojis: false,
            show_location: false,
            timestamp_format: "T".to_string(),
            ..LoggerConfig::new().with_colors(false).with_prefix("studio")
        }
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("debug".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("WARNING".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("loud".parse::<LogLevel>().is_err());
        assert_eq!(LogLevel::Error.to_string(), "ERROR");
    }

    #[test]
    fn test_presets() {
        let config = LoggerConfig::development();
        assert_eq!(config.min_level, LogLevel::Debug);
        assert!(config.colors);

        let prod_config = LoggerConfig::production();
        assert!(!prod_config.colors);
        assert!(prod_config.json);
        assert_eq!(prod_config.log_file, None);
    }

    #[test]
    fn test_json_format_without_log_file_stays_on_stdout() {
        let config = LoggerConfig::from_lookup(lookup(&[("LOG_FORMAT", "json")]));
        assert!(config.json);
        assert_eq!(config.log_file, None);

        let config = LoggerConfig::from_lookup(lookup(&[
            ("LOG_FORMAT", "json"),
            ("LOG_LEVEL", "warn"),
            ("LOG_FILE", "studio.log"),
        ]));
        assert_eq!(config.min_level, LogLevel::Warn);
        assert_eq!(config.log_file, Some(PathBuf::from("studio.log")));
    }

    #[test]
    fn test_default_env_is_pretty_info() {
        let config = LoggerConfig::from_lookup(lookup(&[("LOG_FILE", "")]));
        assert!(!config.json);
        assert_eq!(config.min_level, LogLevel::Info);
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn test_plain_console_format() {
        assert_eq!(
            BeautifulLogger::render(&entry(None), &plain()),
            "[studio] T [WARN] rgen_studio::server::provider slow"
        );
    }

    #[test]
    fn test_request_id_is_rendered() {
        assert_eq!(
            BeautifulLogger::render(&entry(Some("abc")), &plain()),
            "[studio] T [WARN] [req:abc] rgen_studio::server::provider slow"
        );

        let json = BeautifulLogger::render(&entry(Some("abc")), &LoggerConfig::production());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["request_id"], "abc");
        assert_eq!(value["level"], "WARN");
        assert!(value["timestamp"].is_string());

        let json = BeautifulLogger::render(&entry(None), &LoggerConfig::production());
        assert!(!json.contains("request_id"));
    }

    #[tokio::test]
    async fn test_request_id_scope() {
        assert_eq!(current_request_id(), None);
        let seen = with_request_id("req-1".to_string(), async {
            tokio::task::yield_now().await;
            current_request_id()
        })
        .await;
        assert_eq!(seen.as_deref(), Some("req-1"));
        assert_eq!(current_request_id(), None);
    }

    #[test]
    fn test_logger_initialization() {
        assert!(init_with_config(LoggerConfig::development()).is_ok());
    }
}
