use chrono::Local;
use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming};
use log::info;
use std::path::PathBuf;

pub const DEFAULT_LOG_DIR: &str = "/var/tmp/hyprglaze";

/// Start file logging with a stderr duplicate; stdout belongs to the bar.
///
/// `RUST_LOG` wins over `level`. The returned handle must stay alive for the
/// lifetime of the program.
pub fn initialize_logging(
    program_name: &str,
    level: &str,
    log_dir: Option<PathBuf>,
) -> anyhow::Result<LoggerHandle> {
    let timestamp = Local::now().format("%Y-%m-%d_%H_%M_%S").to_string();

    let log_dir = log_dir
        .into_iter()
        .chain(std::iter::once(PathBuf::from(DEFAULT_LOG_DIR)))
        .find(|p| {
            std::fs::create_dir_all(p).ok();
            std::fs::metadata(p).map(|m| m.is_dir()).unwrap_or(false)
        })
        .unwrap_or_else(|| PathBuf::from("."));

    let log_spec = std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string());

    let handle = Logger::try_with_str(log_spec)?
        .format_for_files(flexi_logger::detailed_format)
        .format_for_stderr(flexi_logger::colored_opt_format)
        .log_to_file(
            FileSpec::default()
                .directory(&log_dir)
                .basename(format!("{}_{}", program_name, timestamp))
                .suffix("log"),
        )
        .duplicate_to_stderr(Duplicate::Info)
        .rotate(
            Criterion::Size(10_000_000), // 10MB
            Naming::Numbers,
            Cleanup::KeepLogFiles(5),
        )
        .start()?;

    info!("Log directory: {}", log_dir.display());
    Ok(handle)
}
