//! Faculty CLI
//!
//! Command-line interface over the Faculty SDK.
//!
//! # Usage
//!
//! ```bash
//! # Print a valid access token for the default profile
//! faculty token
//!
//! # List the environments of a project
//! faculty --profile staging environments 5b1d2c3e-4f5a-4b6c-8d7e-9f0a1b2c3d4e
//!
//! # Project path helpers
//! faculty path normalize a/b/../c/
//! faculty path relative /input/ /input/data/train.csv
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use faculty_core::datasets::path as project_path;
use faculty_core::{EnvironmentClient, ProfileQuery, Session, SessionRegistry};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "faculty")]
#[command(about = "Access the Faculty platform from the command line")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Credentials file profile to use
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Path to the credentials file
    #[arg(long, global = true)]
    credentials_path: Option<PathBuf>,

    /// Platform domain
    #[arg(long, global = true)]
    domain: Option<String>,

    /// Protocol used to reach the platform (http or https)
    #[arg(long, global = true)]
    protocol: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a valid access token for the selected profile
    Token,

    /// List the environments of a project
    Environments {
        /// Project ID
        project_id: Uuid,
    },

    /// Project path utilities
    Path {
        #[command(subcommand)]
        command: PathCommand,
    },
}

#[derive(Subcommand)]
enum PathCommand {
    /// Bring a project path into normal form
    Normalize {
        path: String,
    },

    /// Express a path relative to a root directory
    Relative {
        root: String,
        path: String,
    },

    /// List every directory containing a path
    Parents {
        path: String,
    },

    /// Print the directory immediately containing a path
    Parent {
        path: String,
    },
}

#[derive(Serialize)]
struct TokenOutput {
    token: String,
    expires_at: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Token => print_token(&cli).await,
        Commands::Environments { project_id } => list_environments(&cli, *project_id).await,
        Commands::Path { command } => run_path_command(command, cli.format),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Build the profile query from the global flags.
fn profile_query(cli: &Cli) -> ProfileQuery {
    let mut query = ProfileQuery::new();
    query.profile_name = cli.profile.clone();
    query.credentials_path = cli.credentials_path.clone();
    query.domain = cli.domain.clone();
    query.protocol = cli.protocol.clone();
    query
}

fn open_session(cli: &Cli) -> Result<Arc<Session>> {
    let registry = SessionRegistry::from_env();
    let session = registry
        .get(&profile_query(cli), None)
        .context("Failed to resolve Faculty profile")?;
    debug!("Using profile {}", session.profile());
    Ok(session)
}

async fn print_token(cli: &Cli) -> Result<()> {
    let session = open_session(cli)?;
    let token = session
        .access_token()
        .await
        .context("Failed to obtain access token")?;

    match cli.format {
        OutputFormat::Json => {
            let output = TokenOutput {
                token: token.token.expose().to_string(),
                expires_at: token.expires_at.to_rfc3339(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            println!("{}", token.token.expose());
            eprintln!("Expires at {}", token.expires_at.to_rfc3339());
        }
    }
    Ok(())
}

async fn list_environments(cli: &Cli, project_id: Uuid) -> Result<()> {
    let session = open_session(cli)?;
    let client = EnvironmentClient::new(session)?;
    let environments = client
        .list(project_id)
        .await
        .with_context(|| format!("Failed to list environments of project {}", project_id))?;

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&environments)?);
        }
        OutputFormat::Text => {
            if environments.is_empty() {
                println!("No environments in project {}", project_id);
            }
            for environment in environments {
                println!("{}  {}", environment.id, environment.name);
                if !environment.description.is_empty() {
                    println!("    {}", environment.description);
                }
            }
        }
    }
    Ok(())
}

fn run_path_command(command: &PathCommand, format: OutputFormat) -> Result<()> {
    let lines = path_command_output(command)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&lines)?),
        OutputFormat::Text => {
            for line in lines {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

fn path_command_output(command: &PathCommand) -> Result<Vec<String>> {
    let lines = match command {
        PathCommand::Normalize { path } => vec![project_path::normalize(path)],
        PathCommand::Relative { root, path } => vec![project_path::relative(root, path)?],
        PathCommand::Parents { path } => project_path::parent_directories(path),
        PathCommand::Parent { path } => project_path::parent_directory(path).into_iter().collect(),
    };
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "faculty",
            "token",
            "--profile",
            "staging",
            "--domain",
            "test.domain.com",
            "--format",
            "json",
        ])
        .unwrap();

        assert!(matches!(cli.command, Commands::Token));
        assert_eq!(cli.format, OutputFormat::Json);

        let query = profile_query(&cli);
        assert_eq!(query.profile_name.as_deref(), Some("staging"));
        assert_eq!(query.domain.as_deref(), Some("test.domain.com"));
        assert!(query.client_id.is_none());
    }

    #[test]
    fn test_parse_environments_project_id() {
        let cli = Cli::try_parse_from([
            "faculty",
            "environments",
            "5b1d2c3e-4f5a-4b6c-8d7e-9f0a1b2c3d4e",
        ])
        .unwrap();

        match cli.command {
            Commands::Environments { project_id } => {
                assert_eq!(project_id.to_string(), "5b1d2c3e-4f5a-4b6c-8d7e-9f0a1b2c3d4e");
            }
            _ => panic!("expected environments command"),
        }
    }

    #[test]
    fn test_parse_rejects_invalid_project_id() {
        assert!(Cli::try_parse_from(["faculty", "environments", "not-a-uuid"]).is_err());
    }

    #[test]
    fn test_path_command_output() {
        let normalize = PathCommand::Normalize {
            path: "a/b/../c/".to_string(),
        };
        assert_eq!(path_command_output(&normalize).unwrap(), vec!["/a/c/"]);

        let parents = PathCommand::Parents {
            path: "/a/b/c.txt".to_string(),
        };
        assert_eq!(
            path_command_output(&parents).unwrap(),
            vec!["/", "/a/", "/a/b/"]
        );

        let parent = PathCommand::Parent {
            path: "/".to_string(),
        };
        assert!(path_command_output(&parent).unwrap().is_empty());
    }

    #[test]
    fn test_path_relative_error() {
        let relative = PathCommand::Relative {
            root: "/a/".to_string(),
            path: "/x/y".to_string(),
        };
        let err = path_command_output(&relative).unwrap_err();
        assert!(err.to_string().contains("is not a sub path of"));
    }
}
