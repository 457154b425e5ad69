use env_logger::Env;

/// Logger for binaries; `RUST_LOG` overrides the default `info` filter.
pub fn init_logger() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

pub fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
