use log::{info, LevelFilter};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("cannot open log file: {0}")]
    File(#[from] std::io::Error),
    #[error("invalid logger configuration: {0}")]
    Config(#[from] log4rs::config::runtime::ConfigErrors),
    #[error("logger already set: {0}")]
    SetLogger(#[from] log::SetLoggerError),
}

/// One log file per UTC day, e.g. `log/2024-05-01.log`.
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    let current_date = chrono::offset::Utc::now().date_naive().to_string();
    log_dir.join(format!("{}.log", current_date))
}

pub fn init_file_logger(log_dir: &Path, level: LevelFilter) -> Result<PathBuf, LoggerError> {
    let path = log_file_path(log_dir);

    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%H:%M:%S)(utc)} {l} - {m}\n",
        )))
        .build(&path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("logfile", Box::new(logfile)))
        .build(Root::builder().appender("logfile").build(level))?;

    log4rs::init_config(config)?;
    info!("File logger initialized");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_is_named_after_the_day() {
        let path = log_file_path(Path::new("logs"));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.ends_with(".log"));
        assert_eq!(name.len(), "2024-05-01.log".len());
        assert_eq!(path.parent(), Some(Path::new("logs")));
    }
}
