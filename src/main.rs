use clap::Parser;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskdeck::cli;
use taskdeck::cli::commands::{Cli, Commands};

fn main() {
    // Logs go to stderr so --json output on stdout stays parsable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskdeck=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli_args = Cli::parse();
    let json_output = cli_args.json;
    let api_url = cli_args.api_url.clone();

    let exit_code = match cli_args.command {
        Commands::Init => cli::init::run(api_url.as_deref(), json_output),
        Commands::Task(cmd) => cli::task::run(cmd, json_output, api_url.as_deref()),
        Commands::Todo(cmd) => cli::todo::run(cmd, json_output, api_url.as_deref()),
        Commands::Status => cli::status::run(json_output, api_url.as_deref()),
    };

    process::exit(exit_code);
}
