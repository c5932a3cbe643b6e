use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

pub const MAX_LOG_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Moves `path` to `<path>.1` once it has grown past `max_bytes`.
///
/// Returns the rotated path when a rotation happened.
pub fn rotate_if_larger(path: &Path, max_bytes: u64) -> std::io::Result<Option<PathBuf>> {
    match fs::metadata(path) {
        Ok(meta) if meta.len() > max_bytes => {
            let mut rotated = path.as_os_str().to_owned();
            rotated.push(".1");
            let rotated = PathBuf::from(rotated);
            fs::rename(path, &rotated)?;
            Ok(Some(rotated))
        }
        Ok(_) => Ok(None),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    rotate_if_larger(path, MAX_LOG_FILE_BYTES)?;
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global subscriber: stderr always, plus `log_file` when given.
///
/// `RUST_LOG` overrides the default `info` level.
pub fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let file = log_file.map(open_log_file).transpose()?;

    if !tracing::dispatcher::has_been_set() {
        INIT.call_once(|| {
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
            let file_layer = file.map(|file| {
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(file))
            });

            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(file_layer)
                .try_init();
        });
    }
    Ok(())
}
