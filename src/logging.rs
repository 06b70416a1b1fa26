/// Initialize diagnostic logging. Writes to stderr only — stdout is
/// reserved for the byte-exact report format the Reporter produces
/// (spec.md §6/§8), so nothing here may ever touch it.
///
/// `verbose` selects the default level (`INFO` at 0, `DEBUG` at 1,
/// `TRACE` beyond); `RUST_LOG` still overrides it if set, since the
/// subscriber is built on `EnvFilter`.
pub fn init(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
