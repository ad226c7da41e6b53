//! Browser console logging.
//!
//! Core modules log through `tracing`; this installs a subscriber that
//! forwards those events to `console.*` via `tracing-web`.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_web::MakeWebConsoleWriter;

/// Default filter directives: cropper internals at debug, everything else at info.
pub(crate) const DEFAULT_FILTER: &str = "info,cropper_core=debug,cropper_wasm=debug";

/// Install the console subscriber.
///
/// Returns `false` if a global subscriber was already set, which happens when
/// the module is initialized twice.
pub(crate) fn init_logging(directives: &str) -> bool {
    let filter = EnvFilter::new(directives);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new())
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_ok()
}
