//! Log setup for the CLI and redaction of secrets in logged request bodies.

use std::{fs::OpenOptions, path::Path, sync::Arc};

use tracing_subscriber::{
    EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::Error;

const DEFAULT_LOG_FILTER: &str = "warn";

/// Log to stderr, filtered by `RUST_LOG` (default `warn`), and, when
/// `debug_log_path` is given, append everything at DEBUG and above to that
/// file.
///
/// # Errors
///
/// Returns [Error::IoError] if the debug log file cannot be opened.
pub fn setup_logging(debug_log_path: Option<&Path>) -> Result<(), Error> {
    let stderr_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let stderr_log = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(stderr_filter);

    let debug_log = match debug_log_path {
        Some(path) => {
            let log_file = OpenOptions::new().create(true).append(true).open(path)?;

            Some(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_ansi(false)
                    .with_writer(Arc::new(log_file))
                    .with_filter(filter::LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_log)
        .with(debug_log)
        .init();

    Ok(())
}

/// Replace the value of `field_name` in an urlencoded form with asterisks.
pub(crate) fn redact_password(form_text: &str, field_name: &str) -> String {
    let password_start = form_text.find(&format!("{field_name}="));

    let start = match password_start {
        Some(password_pos) => password_pos,
        None => return form_text.to_string(),
    };

    let password_end = form_text[start..].find('&');
    let end = match password_end {
        Some(end) => start + end,
        None => form_text.len(),
    };

    format!(
        "{}{field_name}=********{}",
        &form_text[..start],
        &form_text[end..]
    )
}
