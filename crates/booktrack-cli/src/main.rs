//! BookTrack CLI
//!
//! Command-line interface for BookTrack - a personal book collection kept
//! on a remote server.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use booktrack_core::{Config, Session};

mod commands;
mod logging;
mod output;
mod prompt;

use commands::book::FieldInput;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "booktrack")]
#[command(about = "BookTrack - Keep track of the books you read")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use a config file other than the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the home screen (default)
    Home,
    /// Manage books
    Book {
        #[command(subcommand)]
        command: BookCommands,
    },
    /// Show the signed-in user's profile
    Profile,
    /// Create an account
    Register {
        /// Username
        #[arg(short, long)]
        username: String,
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Password (prompted for, or read from BOOKTRACK_PASSWORD, when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Log in and remember the session
    Login {
        /// Username
        #[arg(short, long)]
        username: String,
        /// Password (prompted for, or read from BOOKTRACK_PASSWORD, when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum BookCommands {
    /// List all books
    #[command(alias = "ls")]
    List,
    /// Add a new book
    #[command(alias = "create")]
    Add {
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Edit a book
    Edit {
        /// Book ID (full ID or prefix)
        id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a book
    #[command(alias = "rm")]
    Delete {
        /// Book ID (full ID or prefix)
        id: String,
    },
}

#[derive(Args)]
struct FieldArgs {
    /// Book title
    #[arg(short = 'T', long)]
    title: Option<String>,
    /// Author
    #[arg(short, long)]
    author: Option<String>,
    /// Genre
    #[arg(short, long)]
    genre: Option<String>,
    /// Description
    #[arg(short, long)]
    description: Option<String>,
}

impl From<FieldArgs> for FieldInput {
    fn from(args: FieldArgs) -> Self {
        FieldInput {
            title: args.title,
            author: args.author,
            genre: args.genre,
            description: args.description,
        }
    }
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (api_url, data_dir, log_file, request_timeout_secs, verify_delete)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands work without a session
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    logging::init(&config, cli.verbose);

    let session = Session::open_with_config(config).context("Failed to open session")?;

    match cli.command.unwrap_or(Commands::Home) {
        Commands::Home => commands::home::show(&session, &output),
        Commands::Book { command } => handle_book_command(command, &session, &output).await,
        Commands::Profile => commands::account::profile(&session, &output).await,
        Commands::Register {
            username,
            email,
            password,
        } => commands::account::register(&session, username, email, password, &output).await,
        Commands::Login { username, password } => {
            commands::account::login(&session, username, password, &output).await
        }
        Commands::Logout => commands::account::logout(&session, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

async fn handle_book_command(
    command: BookCommands,
    session: &Session,
    output: &Output,
) -> Result<()> {
    match command {
        BookCommands::List => commands::book::list(session, output).await,
        BookCommands::Add { fields } => commands::book::add(session, fields.into(), output).await,
        BookCommands::Edit { id, fields } => {
            commands::book::edit(session, id, fields.into(), output).await
        }
        BookCommands::Delete { id } => commands::book::delete(session, id, output).await,
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_book_add_flags() {
        let cli = Cli::try_parse_from([
            "booktrack", "book", "add", "-T", "Dune", "-a", "Herbert", "-g", "SciFi", "-d",
            "desert planet",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Book {
                command: BookCommands::Add { fields },
            }) => {
                let input: FieldInput = fields.into();
                assert_eq!(input.title.as_deref(), Some("Dune"));
                assert_eq!(input.description.as_deref(), Some("desert planet"));
            }
            _ => panic!("expected book add"),
        }
    }

    #[test]
    fn test_parse_aliases_and_default() {
        let cli = Cli::try_parse_from(["booktrack", "book", "rm", "65f1"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Book {
                command: BookCommands::Delete { .. }
            })
        ));

        let cli = Cli::try_parse_from(["booktrack", "--json"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.json);
    }
}
