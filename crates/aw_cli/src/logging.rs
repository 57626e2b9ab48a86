use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Mutex, Once};
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

fn filter(verbose: u8) -> EnvFilter {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Logs to stderr.
pub fn init_logging(verbose: u8) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(filter(verbose))
            .with_writer(std::io::stderr)
            .init();
    });
}

/// Logs to `path`, for when the terminal belongs to the interface.
pub fn init_file_logging(verbose: u8, path: &Path) -> std::io::Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(filter(verbose))
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    });
    Ok(())
}
