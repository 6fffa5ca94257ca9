//! Installs the `env_logger` backend for the `log` records this crate emits.
//!
//! The host process may already own a logger; in that case `try_init` fails
//! quietly and our records go to whatever backend is installed.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Once;

use log::LevelFilter;

use crate::error::ZstdByteaError;

static INIT_LOGGER: Once = Once::new();

/// Installs a logger at `level`, appending to `log_file` when given.
///
/// `RUST_LOG` still overrides the level. Only the first call has any effect.
pub fn enable_logging(level: LevelFilter, log_file: Option<&Path>) -> Result<(), ZstdByteaError> {
    let file = match log_file {
        Some(path) => Some(OpenOptions::new().append(true).create(true).open(path)?),
        None => None,
    };

    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(level);
        builder.parse_default_env();

        // Custom formatter: just print the level and message
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(file) = file {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        let _ = builder.try_init();
    });
    Ok(())
}
