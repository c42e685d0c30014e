use env_logger::Env;

/// Installs the global logger. `RUST_LOG` wins over the configured filter.
/// Calling it twice is harmless; the second call is ignored.
pub fn init_logging(default_filter: &str) {
    let result = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init();
    if result.is_ok() {
        log::info!("logging initialised (default filter: {default_filter})");
    }
}
