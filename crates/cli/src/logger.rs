//! File-based logging for the flowboard CLI.
//!
//! Every run writes to its own file at `~/.flowboard/logs/{run_id}/log`, where
//! the run id is a local timestamp plus the first group of a v4 UUID.

use anyhow::{Context, Result};
use chrono::Local;
use dirs::home_dir;
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

pub struct FlowboardLogger {
    level: LevelFilter,
    file: Mutex<File>,
    /// Mirror every line to stderr.
    echo: bool,
}

impl FlowboardLogger {
    fn new(level: LevelFilter, echo: bool) -> Result<(Self, String, PathBuf)> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let uuid_string = Uuid::new_v4().to_string();
        let uuid = uuid_string.split('-').next().unwrap_or("unknown");
        let run_id = format!("{timestamp}_{uuid}");

        let log_dir = log_dir(&run_id)?;
        create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        let log_path = log_dir.join("log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

        let logger = Self {
            level,
            file: Mutex::new(file),
            echo,
        };
        Ok((logger, run_id, log_path))
    }

    /// Install the logger. Returns the path of this run's log file.
    pub fn init(level: LevelFilter, echo: bool) -> Result<PathBuf> {
        let (logger, run_id, log_path) = Self::new(level, echo)?;

        log::set_boxed_logger(Box::new(logger))
            .map(|()| log::set_max_level(level))
            .map_err(|e| anyhow::anyhow!("Failed to set logger: {}", e))?;

        log::info!("Flowboard logger initialized. Run ID: {}", run_id);
        log::info!("Log file: {}", log_path.display());
        Ok(log_path)
    }
}

fn log_dir(run_id: &str) -> Result<PathBuf> {
    let home = home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
    Ok(home.join(".flowboard").join("logs").join(run_id))
}

/// Map a `-v` count to a level filter.
pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

impl Log for FlowboardLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let message = format!(
            "{} {} [{}] {}",
            timestamp,
            record.level(),
            record.target(),
            record.args()
        );

        if let Ok(mut file) = self.file.lock() {
            // A failed log write must not take the editor down.
            let _ = writeln!(file, "{}", message);
            let _ = file.flush();
        }

        if self.echo {
            eprintln!("{}", message);
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Write a banner separating sections of the log.
pub fn log_section(name: &str) {
    let separator = "=".repeat(50);
    log::info!("{}", separator);
    log::info!("SECTION: {}", name);
    log::info!("{}", separator);
}
