use tracing_subscriber::{
    EnvFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

/// `RUST_LOG` directives win when they parse; otherwise only crate events are
/// shown, and only when `verbose`.
fn build_filter(verbose: bool, env_directives: Option<&str>) -> EnvFilter {
    if let Some(filter) = env_directives.and_then(|dirs| EnvFilter::try_new(dirs).ok()) {
        return filter;
    }
    let level = if verbose { "fxrates=debug" } else { "off" };
    EnvFilter::new(level)
}

pub fn init_logging(verbose: bool) {
    let env_directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(verbose, env_directives.as_deref());

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
