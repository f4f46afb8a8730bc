//! Logging setup
//!
//! `RUST_LOG` wins over the configured level. With a log directory, output
//! goes to a daily rolling file instead of stderr.

use std::path::Path;

use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "card-inventory";

/// Initialize the global subscriber
pub fn init_logger(level: &str, json: bool, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .with_writer(std::io::stderr);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.is_dir() {
            let file_appender = tracing_appender::rolling::daily(log_path, LOG_FILE_PREFIX);
            let builder = builder.with_ansi(false).with_writer(file_appender);
            if json {
                builder.json().init();
            } else {
                builder.init();
            }
            return;
        }
        eprintln!("Log directory {dir} does not exist, logging to stderr");
    }

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
