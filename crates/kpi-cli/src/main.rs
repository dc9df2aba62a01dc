//! `kpi-import` binary

use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> ExitCode {
    let matches = kpi_cli::cli().get_matches();
    init_tracing(kpi_cli::leaf_matches(&matches).get_flag("log-json"));

    let mut out = std::io::stdout().lock();
    match kpi_cli::run(&matches, &mut out) {
        Ok(outcome) => outcome.exit_code(),
        Err(error) => {
            tracing::error!(error = %format!("{error:#}"), "command failed");
            eprintln!("error: {error:#}");
            ExitCode::from(2)
        }
    }
}
