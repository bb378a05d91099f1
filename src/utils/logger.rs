//! Logging setup.
//!
//! Level selection goes through `RUST_LOG` when set, otherwise the
//! configured level. With a log directory, output additionally rolls
//! daily into `storefront.log.<date>` files.

use std::path::Path;

use tracing_subscriber::EnvFilter;

pub fn init_logger() {
    init_logger_with_file("info", None);
}

pub fn init_logger_with_file(log_level: &str, log_dir: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir
        && std::fs::create_dir_all(dir).is_ok()
    {
        let appender = tracing_appender::rolling::daily(dir, "storefront.log");
        subscriber.with_writer(appender).init();
        return;
    }

    subscriber.init();
}
