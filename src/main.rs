use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use spinup_cli::commands::update::ContainerUpdate;
use spinup_cli::commands::{configure, get, list, update, version, Session};
use spinup_cli::config::{Config, Overrides};
use spinup_cli::output;
use spinup_cli::resource::{Kind, Projection};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Command-line client for Spinup
#[derive(Parser, Debug)]
#[command(name = "spinup", version = version::VERSION, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.spinup.json or ~/.spinup.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Spinup base url
    #[arg(long, global = true)]
    url: Option<String>,

    /// Spinup API token
    #[arg(long, global = true)]
    token: Option<String>,

    /// Default spaces searched for bare resource names
    #[arg(short, long, global = true)]
    spaces: Vec<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Shortcut for --log-level info
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Shortcut for --log-level debug
    #[arg(long, global = true)]
    debug: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get information about a resource or space
    Get {
        #[command(subcommand)]
        command: GetCommands,
    },

    /// List spaces, resources, images or secrets
    List {
        #[command(subcommand)]
        command: ListCommands,
    },

    /// Update a resource
    Update {
        #[command(subcommand)]
        command: UpdateCommands,
    },

    /// Write the config file interactively
    Configure {
        /// Print the effective configuration instead
        #[arg(long)]
        show: bool,
    },

    /// Print version information
    Version,
}

#[derive(Subcommand, Debug)]
enum GetCommands {
    /// Get a container service
    Container {
        /// [space/]name
        id: String,
        #[arg(short, long)]
        details: bool,
        /// Service events, newest first
        #[arg(long, conflicts_with_all = ["details", "tasks"])]
        events: bool,
        /// Running tasks
        #[arg(long, conflicts_with = "details")]
        tasks: bool,
    },
    /// Get a database
    Database {
        /// [space/]name
        id: String,
        #[arg(short, long)]
        details: bool,
    },
    /// Get a server
    Server {
        /// [space/]name
        id: String,
        #[arg(short, long)]
        details: bool,
    },
    /// Get a storage bucket
    Storage {
        /// [space/]name
        id: String,
        #[arg(short, long)]
        details: bool,
    },
    /// Get a space
    Space {
        space: String,
        /// Include the cost estimate
        #[arg(short, long)]
        cost: bool,
    },
    /// Get the secrets of a space
    Secrets { space: Option<String> },
    /// Get the images of a space
    Images { space: Option<String> },
}

#[derive(Subcommand, Debug)]
enum ListCommands {
    /// List spaces
    Spaces {
        /// Include each space's cost estimate
        #[arg(short, long)]
        cost: bool,
    },
    /// List the resources in spaces
    Resources {
        #[arg(value_name = "SPACE")]
        space_names: Vec<String>,
        /// Include failed resources
        #[arg(long)]
        show_failed: bool,
    },
    /// List the images in spaces
    Images {
        #[arg(value_name = "SPACE")]
        space_names: Vec<String>,
    },
    /// List the secrets in spaces
    Secrets {
        #[arg(value_name = "SPACE")]
        space_names: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
enum UpdateCommands {
    /// Update a container service
    Container {
        /// [space/]name
        id: String,
        /// Redeploy with the current configuration
        #[arg(short, long)]
        redeploy: bool,
        /// Scale the service to this many tasks
        #[arg(long)]
        scale: Option<i64>,
        /// Container whose image tag to change
        #[arg(long)]
        container: Option<String>,
        /// New image tag for --container
        #[arg(long)]
        tag: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn directive(self) -> Option<&'static str> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some("error"),
            LogLevel::Warn => Some("warn"),
            LogLevel::Info => Some("info"),
            LogLevel::Debug => Some("debug"),
            LogLevel::Trace => Some("trace"),
        }
    }
}

impl Cli {
    fn effective_log_level(&self) -> LogLevel {
        if self.debug {
            LogLevel::Debug
        } else if self.verbose {
            LogLevel::Info
        } else {
            self.log_level
        }
    }

    fn overrides(&self) -> Overrides {
        Overrides {
            url: self.url.clone(),
            token: self.token.clone(),
            spaces: self.spaces.clone(),
        }
    }

    fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Config::default_path)
    }
}

/// Logs go to stderr (stdout carries the JSON document) or to `log_file`.
/// RUST_LOG, when set, overrides the level.
fn setup_logging(
    level: LogLevel,
    log_file: Option<&PathBuf>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match level.directive() {
            Some(directive) => EnvFilter::new(format!("spinup={0},spinup_cli={0}", directive)),
            None => return Ok(None),
        },
    };

    let (writer, guard) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_appender::non_blocking(file)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::debug!("spinup {} started with log level: {:?}", version::VERSION, level);
    Ok(Some(guard))
}

fn details_or_summary(details: bool) -> Projection {
    if details {
        Projection::Details
    } else {
        Projection::Summary
    }
}

async fn connect(cli: &Cli) -> Result<Session> {
    let path = cli.config_path();
    let config = Config::resolve(path.as_deref(), &cli.overrides())?;
    Ok(Session::connect(config).await?)
}

async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Version => output::print_json(&version::info()),

        Commands::Configure { show } => {
            let path = cli
                .config_path()
                .context("unable to determine home directory, pass --config")?;
            if *show {
                let config = Config::resolve(Some(path.as_path()), &cli.overrides())?;
                output::print_json(&config.masked())
            } else {
                configure::run(&path)
            }
        }

        Commands::Get { command } => {
            let session = connect(&cli).await?;
            let out = match command {
                GetCommands::Container {
                    id,
                    details,
                    events,
                    tasks,
                } => {
                    let projection = if *tasks {
                        Projection::Tasks
                    } else if *events {
                        Projection::Events
                    } else {
                        details_or_summary(*details)
                    };
                    get::resource(&session, Kind::Container, id, projection).await?
                }
                GetCommands::Database { id, details } => {
                    get::resource(&session, Kind::Database, id, details_or_summary(*details))
                        .await?
                }
                GetCommands::Server { id, details } => {
                    get::resource(&session, Kind::Server, id, details_or_summary(*details)).await?
                }
                GetCommands::Storage { id, details } => {
                    get::resource(&session, Kind::Storage, id, details_or_summary(*details)).await?
                }
                GetCommands::Space { space, cost } => get::space(&session, space, *cost).await?,
                GetCommands::Secrets { space } => get::secrets(&session, space.clone()).await?,
                GetCommands::Images { space } => get::images(&session, space.clone()).await?,
            };
            output::print_json(&out)
        }

        Commands::List { command } => {
            let session = connect(&cli).await?;
            let out = match command {
                ListCommands::Spaces { cost } => list::spaces(&session, *cost).await?,
                ListCommands::Resources {
                    space_names,
                    show_failed,
                } => list::resources(&session, space_names, *show_failed).await?,
                ListCommands::Images { space_names } => list::images(&session, space_names).await?,
                ListCommands::Secrets { space_names } => {
                    list::secrets(&session, space_names).await?
                }
            };
            output::print_json(&out)
        }

        Commands::Update { command } => {
            let session = connect(&cli).await?;
            match command {
                UpdateCommands::Container {
                    id,
                    redeploy,
                    scale,
                    container,
                    tag,
                } => {
                    let flags = ContainerUpdate {
                        redeploy: *redeploy,
                        scale: *scale,
                        container: container.clone(),
                        tag: tag.clone(),
                    };
                    update::container(&session, id, &flags).await?;
                }
            }
            output::print_ok();
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = match setup_logging(cli.effective_log_level(), cli.log_file.as_ref()) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("command failed: {:?}", err);
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_get_container_tasks() {
        let cli = Cli::try_parse_from(["spinup", "get", "container", "teamA/web", "--tasks", "-s", "teamB"])
            .unwrap();
        assert_eq!(cli.spaces, vec!["teamB"]);
        match cli.command {
            Commands::Get {
                command: GetCommands::Container { id, tasks, .. },
            } => {
                assert_eq!(id, "teamA/web");
                assert!(tasks);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_events_conflicts_with_details() {
        assert!(Cli::try_parse_from(["spinup", "get", "container", "web", "-d", "--events"]).is_err());
    }

    #[test]
    fn test_log_level_shortcuts() {
        let cli = Cli::try_parse_from(["spinup", "--debug", "version"]).unwrap();
        assert!(matches!(cli.effective_log_level(), LogLevel::Debug));
        let cli = Cli::try_parse_from(["spinup", "version", "-v"]).unwrap();
        assert!(matches!(cli.effective_log_level(), LogLevel::Info));
        let cli = Cli::try_parse_from(["spinup", "version"]).unwrap();
        assert!(matches!(cli.effective_log_level(), LogLevel::Warn));
    }
}
