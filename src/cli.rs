//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use url::Url;

use crate::config::{parse_api_url, ConnectionConfig};
use crate::upload::UploadOptions;

/// Upload datasets to CloudLabel and synchronize project assets locally.
#[derive(Parser, Debug, Clone)]
#[command(name = "cloudlabel", version)]
pub struct Cli {
    /// Project slug to connect to
    #[arg(long)]
    pub project: String,

    /// Your CloudLabel username
    #[arg(long, env = "CLOUDLABEL_USERNAME")]
    pub username: Option<String>,

    /// Your CloudLabel secret token
    #[arg(long, env = "CLOUDLABEL_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// API URL, e.g. http://localhost:8000/api/v1/
    #[arg(long, value_parser = parse_api_url)]
    pub api_url: Url,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Synchronize your local cache directory with the remote project.
    Sync,

    /// Upload a whole directory to your CloudLabel project.
    #[command(name = "upload_dir", alias = "upload-dir")]
    UploadDir(UploadArgs),

    /// Upload a single file or directory to your CloudLabel project.
    Upload(UploadArgs),
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct UploadArgs {
    /// File or directory to upload
    pub path: PathBuf,

    /// Create tags on-the-fly
    #[arg(long)]
    pub create_tags: bool,

    /// Don't do it for real: validate against the project only
    #[arg(long)]
    pub dry_run: bool,
}

impl UploadArgs {
    pub fn options(&self) -> UploadOptions {
        UploadOptions {
            create_tags: self.create_tags,
            dry_run: self.dry_run,
        }
    }
}

impl Cli {
    pub fn connection(&self) -> ConnectionConfig {
        ConnectionConfig::new(
            self.project.clone(),
            self.username.clone(),
            self.token.clone(),
            self.api_url.clone(),
        )
    }

    /// Default log filter for the `-v` count. `RUST_LOG` still wins.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
