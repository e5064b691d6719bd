mod cli;
mod config;
mod draft;
mod error;
mod github;
mod logbook;
mod publish;

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Outcome};
use github::GitHubClient;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli::run(&cli, |settings| GitHubClient::from_env(&settings.api_url)) {
        Ok(Outcome::Published(result)) => println!("Published: {}", result.url),
        Ok(Outcome::DryRun { title, body }) => {
            println!("Title: {title}\n\n{body}");
        }
        Err(e) => {
            eprintln!("{}", e.diagnostic());
            process::exit(e.exit_code());
        }
    }
}
