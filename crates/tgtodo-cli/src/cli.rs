//! Command-line interface definition using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tgtodo_core::config;

/// tg-todo - Telegram Mini App client tools
#[derive(Parser, Debug)]
#[command(name = "tgtodo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Storage file standing in for browser local storage
    #[arg(long, env = "TGTODO_STORAGE_FILE", global = true)]
    pub storage: Option<PathBuf>,

    /// URL the Mini App was launched with
    #[arg(short = 'u', long = "url", env = "TGTODO_LAUNCH_URL", global = true)]
    pub launch_url: Option<String>,

    /// Init data exposed by the Telegram host bridge
    #[arg(long, env = "TGTODO_BRIDGE_INIT_DATA", global = true)]
    pub bridge: Option<String>,

    /// Backend base URL (`/api` is appended when missing)
    #[arg(long, env = "TGTODO_API_BASE_URL", global = true)]
    pub api: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the resolved init data
    Resolve,

    /// Show a redacted snapshot of every init data source
    Inspect,

    /// Force init data for sessions outside Telegram
    SetMock {
        /// Payload containing hash= and auth_date=
        #[arg(required = true)]
        value: String,
    },

    /// Remove cached and forced init data
    Clear,

    /// Print the deep-link start parameter
    StartParam,

    /// Check authentication and Notion connection status
    Status {
        /// Start parameter to forward (defaults to the launch one)
        #[arg(short, long)]
        start_param: Option<String>,
    },

    /// Print the Notion authorization link
    NotionUrl,

    /// Show the current user
    Me,

    /// List tasks
    Tasks {
        /// Task view filter
        #[arg(long)]
        view: Option<String>,

        /// Restrict to one Notion database
        #[arg(long)]
        database_id: Option<String>,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Show comments on a task
    Comments {
        /// Task id
        task_id: String,
    },

    /// Add a comment to a task
    Comment {
        /// Task id
        task_id: String,

        /// Comment text
        content: String,

        /// Reply to this comment
        #[arg(long)]
        parent: Option<String>,
    },

    /// List Notion databases
    Databases {
        /// Filter by name
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Manage group bindings
    #[command(subcommand)]
    Groups(GroupCommands),
}

#[derive(Subcommand, Debug)]
pub enum GroupCommands {
    /// List groups shared with the bot
    List,

    /// Bind a group to a Notion database
    Bind { group_id: String, db_id: String },

    /// Remove a group's database binding
    Unbind { group_id: String },

    /// Check a database has the required properties
    ValidateDb { group_id: String, db_id: String },

    /// Create missing properties in a database
    InitDb { group_id: String, db_id: String },
}

impl Cli {
    /// Storage file path, using the state directory default if not specified.
    pub fn storage_file(&self) -> PathBuf {
        self.storage.clone().unwrap_or_else(config::storage_file)
    }

    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_resolve_with_url() {
        let cli = Cli::parse_from(["tgtodo", "resolve", "--url", "https://app/?init_data=x"]);
        assert!(matches!(cli.command, Commands::Resolve));
        assert_eq!(cli.launch_url.as_deref(), Some("https://app/?init_data=x"));
    }

    #[test]
    fn test_cli_parse_set_mock() {
        let cli = Cli::parse_from(["tgtodo", "set-mock", "auth_date=1&hash=x"]);
        match cli.command {
            Commands::SetMock { value } => assert_eq!(value, "auth_date=1&hash=x"),
            _ => panic!("Expected SetMock command"),
        }
    }

    #[test]
    fn test_cli_parse_tasks() {
        let cli = Cli::parse_from(["tgtodo", "tasks", "--view", "assigned", "--json"]);
        match cli.command {
            Commands::Tasks { view, json, .. } => {
                assert_eq!(view.as_deref(), Some("assigned"));
                assert!(json);
            }
            _ => panic!("Expected Tasks command"),
        }
    }

    #[test]
    fn test_cli_parse_comment_reply() {
        let cli = Cli::parse_from(["tgtodo", "comment", "t1", "on it", "--parent", "c1"]);
        match cli.command {
            Commands::Comment {
                task_id,
                content,
                parent,
            } => {
                assert_eq!(task_id, "t1");
                assert_eq!(content, "on it");
                assert_eq!(parent.as_deref(), Some("c1"));
            }
            _ => panic!("Expected Comment command"),
        }
    }

    #[test]
    fn test_cli_parse_group_bind() {
        let cli = Cli::parse_from(["tgtodo", "groups", "bind", "-100200", "db1"]);
        match cli.command {
            Commands::Groups(GroupCommands::Bind { group_id, db_id }) => {
                assert_eq!(group_id, "-100200");
                assert_eq!(db_id, "db1");
            }
            _ => panic!("Expected groups bind command"),
        }
    }

    #[test]
    fn test_cli_parse_validate_db() {
        let cli = Cli::parse_from(["tgtodo", "groups", "validate-db", "g1", "db1"]);
        assert!(matches!(
            cli.command,
            Commands::Groups(GroupCommands::ValidateDb { .. })
        ));
    }

    #[test]
    fn test_cli_parse_databases_search() {
        let cli = Cli::parse_from(["tgtodo", "databases", "-s", "Road"]);
        match cli.command {
            Commands::Databases { search } => assert_eq!(search.as_deref(), Some("Road")),
            _ => panic!("Expected Databases command"),
        }
    }

    #[test]
    fn test_cli_storage_override() {
        let cli = Cli::parse_from(["tgtodo", "clear", "--storage", "/tmp/s.json"]);
        assert_eq!(cli.storage_file(), PathBuf::from("/tmp/s.json"));
    }

    #[test]
    fn test_cli_verbose() {
        let cli = Cli::parse_from(["tgtodo", "-vvv", "inspect"]);
        assert_eq!(cli.verbose, 3);
        assert_eq!(cli.log_level(), tracing::Level::TRACE);
    }

    #[test]
    fn test_cli_help() {
        Cli::command().debug_assert();
    }
}
