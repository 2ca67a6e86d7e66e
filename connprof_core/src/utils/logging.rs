use env_logger::Env;

/// Initialize logging using env_logger.
/// `default_filter` applies when RUST_LOG is unset,
/// e.g. `RUST_LOG=connprof_core=debug connprof list`.
///
/// Safe to call more than once; only the first call installs the logger.
pub fn init_logging(default_filter: &str) {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .try_init();
}
