use std::str::FromStr;

use tracing_subscriber::{
    fmt::format::FmtSpan,
    prelude::*,
    EnvFilter,
};

/// Install a stderr subscriber filtered by `RUST_LOG`, or by a per-profile
/// default when it is unset. Accept/reject decisions are logged under the
/// `stationrelay_runtime` target.
pub fn init(pretty: bool) {
    let console_filter = console_filter();

    let stderr_layer =
        tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false);

    let s = tracing_subscriber::registry();

    if pretty {
        s.with(stderr_layer.pretty().with_filter(console_filter)).init();
    } else {
        s.with(
            stderr_layer
                .with_line_number(false)
                .with_span_events(FmtSpan::NONE)
                .with_filter(console_filter),
        )
        .init();
    }

    tracing::debug!("tracing subsystem initialized");
}

fn console_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::from_str(default_directive()).unwrap_or_default())
}

fn default_directive() -> &'static str {
    if cfg!(debug_assertions) {
        "info,stationrelay=debug,stationrelay_net=debug,stationrelay_runtime=debug,stationrelay_codec=debug,stationrelay_message=debug"
    } else {
        "warn,stationrelay=info,stationrelay_net=info,stationrelay_runtime=info,stationrelay_codec=info,stationrelay_message=info"
    }
}
