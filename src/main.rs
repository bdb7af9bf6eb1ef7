// Entrypoint for the CLI application.
// - Parses arguments and resolves the connection settings once.
// - Dispatches to `sync` or `upload`; any error ends the run with a
//   non-zero status and the error chain on stderr.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use cloudlabel_cli::api::ApiClient;
use cloudlabel_cli::cli::{Cli, Command};
use cloudlabel_cli::config::token_file;
use cloudlabel_cli::{sync, ui, upload};

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    let token_path = token_file();
    let mut config = cli.connection().with_saved_token(token_path.as_deref());
    info!("Project {} at {}", config.project, config.api_url);

    match &cli.command {
        Command::Sync => {
            let api = ApiClient::new(&config)?;
            let dir = std::env::current_dir().context("Cannot determine working directory")?;
            let progress = ui::sync_progress();
            let report = sync::sync(&api, &config.project, &dir, &progress)
                .with_context(|| format!("Sync of project {} failed", config.project))?;
            ui::print_sync_report(&report);
        }
        Command::UploadDir(args) | Command::Upload(args) => {
            if config.token.is_none() {
                config.token = ui::prompt_token(token_path.as_deref())?;
            }
            let api = ApiClient::new(&config)?;
            let response = upload::upload(&api, &args.path, args.options())
                .with_context(|| format!("Upload of {} failed", args.path.display()))?;
            ui::print_response(&response)?;
        }
    }
    Ok(())
}
