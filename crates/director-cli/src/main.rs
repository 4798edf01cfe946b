//! Director CLI - AI 취재 디렉터
//!
//! Terminal front end for the AI reporting director backend.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::Cli;

/// Initialize tracing on stderr, optionally mirrored to a file.
///
/// Output goes to stderr so rendered guidance and `--json` payloads on
/// stdout stay clean.
fn init_tracing(log_file: Option<&std::path::Path>, verbose: bool) {
    let default_filter = if verbose {
        "director=debug,director_core=debug"
    } else {
        "director=warn,director_core=warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if let Some(path) = log_file {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| std::path::Path::new("."));
        let _ = std::fs::create_dir_all(dir);
        let file_name = path
            .file_name()
            .map(|f| f.to_os_string())
            .unwrap_or_else(|| "director.log".into());
        let appender = tracing_appender::rolling::never(dir, file_name);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(appender)
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref(), cli.verbose);

    if let Err(e) = cli.execute().await {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}
