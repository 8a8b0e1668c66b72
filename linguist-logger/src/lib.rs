use log::error;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
const DEFAULT_LOG_DIR: &str = "./logs";
const DEFAULT_FILE_PREFIX: &str = "linguist.log";
const DEFAULT_LEVEL: &str = "info";
const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 3600;

/// 日志初始化错误
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("invalid log filter '{directive}': {message}")]
    InvalidFilter { directive: String, message: String },
    #[error("global subscriber already initialized")]
    AlreadyInitialized,
}

/// 日志配置
///
/// 既可以用构建器方式设置，也可以作为配置文件中的一节反序列化：
///
/// ```yaml
/// level: ${LOG_LEVEL:info,linguist_core=debug}
/// log_dir: ./logs
/// max_files: 7
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// 日志文件前缀 (实际文件名会包含日期，如 linguist.log.2023-10-01)
    file_prefix: String,
    log_dir: PathBuf,
    /// 时间格式字符串 (基于 Chrono 格式)
    time_format: String,
    /// `EnvFilter` 指令，如 `info` 或 `warn,linguist_core=debug`
    level: String,
    console: bool,
    file: bool,
    /// 保留的最大日志文件数量，未设置时不清理
    max_files: Option<usize>,
    /// 清理任务检查间隔（秒），为 0 时只在初始化时清理一次
    cleanup_interval_secs: u64,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            level: DEFAULT_LEVEL.to_string(),
            console: true,
            file: true,
            max_files: None,
            cleanup_interval_secs: DEFAULT_CLEANUP_INTERVAL_SECS,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置日志文件前缀
    pub fn file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    /// 设置日志存储目录
    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    /// 设置时间格式
    pub fn time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = format.into();
        self
    }

    /// 设置日志过滤指令
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// 是否输出到控制台
    pub fn enable_console(mut self, enable: bool) -> Self {
        self.console = enable;
        self
    }

    /// 是否输出到文件
    pub fn enable_file(mut self, enable: bool) -> Self {
        self.file = enable;
        self
    }

    /// 设置保留的最大日志文件数量
    pub fn max_files(mut self, count: usize) -> Self {
        self.max_files = Some(count);
        self
    }

    /// 设置清理任务的检查间隔
    pub fn cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval_secs = interval.as_secs();
        self
    }

    /// 初始化日志系统
    ///
    /// 注册全局 tracing subscriber，并按 `max_files` 清理旧日志。
    /// 返回的 `WorkerGuard` 必须被持有，以确保异步日志在程序结束前被刷新。
    pub fn init(self) -> Result<Option<WorkerGuard>, LoggerError> {
        // 两个输出层各自持有一个过滤器
        let console_layer = if self.console {
            Some(
                fmt::layer()
                    .with_timer(ChronoLocal::new(self.time_format.clone()))
                    .with_writer(std::io::stdout)
                    .with_filter(self.filter()?),
            )
        } else {
            None
        };

        let (file_layer, guard) = if self.file {
            let file_appender = tracing_appender::rolling::daily(&self.log_dir, &self.file_prefix);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .with_timer(ChronoLocal::new(self.time_format.clone()))
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_filter(self.filter()?);
            (Some(layer), Some(guard))
        } else {
            (None, None)
        };

        Registry::default()
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .map_err(|_| LoggerError::AlreadyInitialized)?;

        self.start_cleanup();
        Ok(guard)
    }

    fn filter(&self) -> Result<EnvFilter, LoggerError> {
        EnvFilter::try_new(&self.level).map_err(|e| LoggerError::InvalidFilter {
            directive: self.level.clone(),
            message: e.to_string(),
        })
    }

    /// 立即清理一次，配置了间隔时再启动后台线程定期清理
    fn start_cleanup(&self) {
        let Some(max_files) = self.max_files else {
            return;
        };
        if !self.file {
            return;
        }

        prune_logs(&self.log_dir, &self.file_prefix, max_files);
        if self.cleanup_interval_secs == 0 {
            return;
        }

        let log_dir = self.log_dir.clone();
        let file_prefix = self.file_prefix.clone();
        let interval = Duration::from_secs(self.cleanup_interval_secs);
        std::thread::spawn(move || {
            loop {
                std::thread::sleep(interval);
                prune_logs(&log_dir, &file_prefix, max_files);
            }
        });
    }
}

/// 保留最新的 `max_files` 个日志文件，返回删除的数量
///
/// 依赖滚动文件的日期后缀按字典序即时间序（如 `.2023-10-01`）。
pub fn prune_logs(log_dir: &Path, file_prefix: &str, max_files: usize) -> usize {
    if !log_dir.exists() {
        return 0;
    }

    let read_dir = match std::fs::read_dir(log_dir) {
        Ok(dir) => dir,
        Err(e) => {
            error!("Failed to read log directory: {}", e);
            return 0;
        }
    };

    let mut log_files: Vec<_> = read_dir
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let file_name = entry.file_name().into_string().ok()?;
            file_name
                .starts_with(file_prefix)
                .then(|| (entry.path(), file_name))
        })
        .collect();

    // 降序：[linguist.log.2023-10-02, linguist.log.2023-10-01, ...]
    log_files.sort_by(|a, b| b.1.cmp(&a.1));

    let mut removed = 0;
    for (path, _) in log_files.iter().skip(max_files) {
        match std::fs::remove_file(path) {
            Ok(()) => removed += 1,
            Err(e) => error!("Failed to remove old log file {:?}: {}", path, e),
        }
    }
    removed
}
