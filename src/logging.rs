use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, EnvFilter, Layer, Registry};

/// Initialize logging.  Nothing is printed unless the environment variable
/// `RUST_LOG` is set to a non-empty filter, in which case we log compactly to
/// stderr.  Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let mut layers = Vec::new();
    // If RUST_LOG is present and *non-empty* then interpret it and use it.
    // Scripts tend to set RUST_LOG unconditionally but potentially with an
    // empty value, and we don't want that to be interpreted as a desire to
    // enable logging.
    if let Ok(rustlog) = std::env::var("RUST_LOG") {
        if !rustlog.is_empty() {
            if let Ok(env_filter) = EnvFilter::try_from_default_env() {
                let layer = tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact()
                    // The log usually ends up in a file or a CI log, where ANSI
                    // isn't helpful.
                    .with_ansi(false)
                    // Elapsed times are already in the progress messages.
                    .without_time()
                    .with_filter(env_filter)
                    .boxed();
                layers.push(layer);
            }
        }
    }

    let subscriber = Registry::default().with(layers);
    // Fails only if a global subscriber is already installed, which is fine.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
