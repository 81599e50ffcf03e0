use crate::error::{Result as ServerErrorResult, ServerError};

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::info;

/// Route the `log` facade through fern.
///
/// Exactly one sink is wired: the log file when `log_file` is set, otherwise
/// stdout (colored only when asked for, so piped output stays free of escape
/// codes). Every record carries a UTC timestamp and its origin file:line:
///
/// `2026-08-25T09:30:00Z INFO routed chat frame [chat_router.rs:88]`
pub fn initialize(
    log_level: crew_config::LogLevel,
    log_file: Option<PathBuf>,
    colored: bool,
) -> ServerErrorResult<()> {
    let sink = match log_file {
        Some(ref path) => file_sink(path)?,
        None if colored => colored_stdout_sink(),
        None => plain_stdout_sink(),
    };

    Dispatch::new()
        .level(log_level.0)
        .chain(sink)
        .apply()
        .map_err(|e| ServerError::Logger {
            message: format!("Logger already initialized: {e}"),
        })?;

    match log_file {
        Some(path) => info!("Logging at {} to {}", log_level.0, path.display()),
        None => info!("Logging at {} to stdout", log_level.0),
    }

    Ok(())
}

fn file_sink(path: &Path) -> ServerErrorResult<Dispatch> {
    let file = fern::log_file(path).map_err(|e| ServerError::Logger {
        message: format!("Cannot open log file {}: {e}", path.display()),
    })?;

    Ok(Dispatch::new().format(plain_format).chain(file))
}

fn plain_stdout_sink() -> Dispatch {
    Dispatch::new().format(plain_format).chain(std::io::stdout())
}

fn colored_stdout_sink() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .trace(Color::Magenta)
        .debug(Color::Blue)
        .info(Color::Green)
        .warn(Color::Yellow)
        .error(Color::Red);

    Dispatch::new()
        .format(move |out, message, record| {
            write_record(out, message, record, colors.color(record.level()));
        })
        .chain(std::io::stdout())
}

fn plain_format(out: FormatCallback, message: &std::fmt::Arguments, record: &log::Record) {
    write_record(out, message, record, record.level());
}

fn write_record<L: std::fmt::Display>(
    out: FormatCallback,
    message: &std::fmt::Arguments,
    record: &log::Record,
    level: L,
) {
    out.finish(format_args!(
        "{date} {level} {message} [{file}:{line}]",
        date = humantime::format_rfc3339_seconds(SystemTime::now()),
        level = level,
        message = message,
        file = record.file().unwrap_or("unknown"),
        line = record.line().unwrap_or(0),
    ));
}
