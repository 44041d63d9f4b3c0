//! Logger utility for application-wide logging
//!
//! A `log::Log` implementation that writes every record to a file and echoes
//! it to stdout.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use log::{Log, Record, Metadata, LevelFilter};

/// Custom logger implementation
pub struct Logger {
    /// File handle for log output
    file: Mutex<File>,
    level: LevelFilter,
}

impl Logger {
    /// Creates a logger writing to `log_file`, truncating it
    pub fn new<P: AsRef<Path>>(log_file: P, level: LevelFilter) -> io::Result<Self> {
        let file = File::create(log_file)?;
        Ok(Logger {
            file: Mutex::new(file),
            level,
        })
    }

    /// Writes one line to the log file
    pub fn write_line(&self, message: &str) -> io::Result<()> {
        // A poisoned lock still holds a usable file handle
        let mut file = self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        writeln!(file, "{}", message)?;
        file.flush()
    }

    /// Static method to initialize the global logger
    pub fn init_global_logger<P: AsRef<Path>>(log_file: P, level: LevelFilter) -> io::Result<()> {
        let global_logger = Logger::new(log_file, level)?;

        if log::set_boxed_logger(Box::new(global_logger)).is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }

        log::set_max_level(level);
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("[{}] {}", record.level(), record.args());
            let _ = self.write_line(&message);

            println!("{}", message);
        }
    }

    fn flush(&self) {
        // Already flushing in write_line
    }
}
