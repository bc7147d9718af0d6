use std::any::Any;
use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset. HTTP internals are noisy at info.
pub const DEFAULT_LOG_DIRECTIVES: &str = "info,hyper=warn,hyper_util=warn,reqwest=warn";

/// Install the stderr subscriber. Safe to call more than once.
pub fn init_tracing() {
    // RUST_LOG=drafter_core=debug,drafter_neural=debug
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES));

    // stdout belongs to the probe's suggestion listing.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .compact()
        .try_init();
}

/// Route panics through tracing so they land next to the fetcher's own logs.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let (file, line) = info
            .location()
            .map_or(("?", 0), |at| (at.file(), at.line()));
        let current = std::thread::current();
        tracing::error!(
            file,
            line,
            thread = current.name().unwrap_or("?"),
            "panicked: {}",
            panic_message(info.payload())
        );
    }));
}

/// Text of a `panic!` payload. Only `&str` and `String` carry one.
pub fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "Box<dyn Any>"
    }
}
