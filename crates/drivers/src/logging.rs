use env_logger::Env;

/// `RUST_LOG` wins over the configured level.
pub fn init_logging(default_level: &str) {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .try_init();
}
