use std::io;

use tracing_subscriber::EnvFilter;

use plum_core::uci::uci_top::run_stdio_loop;

fn main() -> io::Result<()> {
    // stdout carries the UCI protocol, so diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    run_stdio_loop()
}
