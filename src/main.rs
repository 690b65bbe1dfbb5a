use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DEPGRAPH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();
    let cli = polyglot_depgraph::cli::parse();
    let code = polyglot_depgraph::app::run_cli(cli);
    if code != 0 {
        std::process::exit(code);
    }
}
