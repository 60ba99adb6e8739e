//! Command handlers for CLI subcommands.

use std::sync::Arc;

use tgtodo_api::{ApiClient, CreateCommentRequest, ListTasksParams};
use tgtodo_core::config;
use tgtodo_initdata::{DebugConsole, InitDataResolver, LaunchUrl, StaticBridge};
use tgtodo_persistence::FileStore;
use tracing::{debug, info};

use crate::cli::{Cli, Commands, GroupCommands};

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Build the resolver for this invocation.
///
/// Each CLI run plays the part of one page load.
pub fn build_resolver(cli: &Cli) -> Result<Arc<InitDataResolver>> {
    let storage = cli.storage_file();
    debug!(path = %storage.display(), "Using storage file");

    let launch = cli
        .launch_url
        .as_deref()
        .map(LaunchUrl::parse)
        .transpose()?;
    Ok(Arc::new(InitDataResolver::new(
        Arc::new(FileStore::new(storage)),
        Arc::new(StaticBridge::from_option(cli.bridge.clone())),
        launch,
    )))
}

/// Execute a CLI command.
pub async fn execute(cli: Cli) -> Result<()> {
    let resolver = build_resolver(&cli)?;

    match &cli.command {
        Commands::Resolve => cmd_resolve(&resolver),
        Commands::Inspect => cmd_inspect(debug_console(&resolver)),
        Commands::SetMock { value } => cmd_set_mock(debug_console(&resolver), value),
        Commands::Clear => {
            debug_console(&resolver).clear_init_data();
            println!("Cleared cached init data");
            Ok(())
        }
        Commands::StartParam => {
            if let Some(start_param) = resolver.start_param() {
                println!("{}", start_param);
            }
            Ok(())
        }
        Commands::Status { start_param } => {
            let client = api_client(&cli, resolver.clone())?;
            let start_param = start_param.clone().or_else(|| resolver.start_param());
            let status = client.auth_status(start_param.as_deref()).await?;
            println!("User: {} ({})", status.user.name, status.user.id);
            println!(
                "Notion: {}",
                if status.notion_connected { "connected" } else { "not connected" }
            );
            if let Some(hint) = status.redirect_hint {
                println!("Redirect: {}", hint);
            }
            Ok(())
        }
        Commands::NotionUrl => {
            let client = api_client(&cli, resolver)?;
            println!("{}", client.notion_auth_url().await?);
            Ok(())
        }
        Commands::Me => {
            let client = api_client(&cli, resolver)?;
            println!("{}", serde_json::to_string_pretty(&client.me().await?)?);
            Ok(())
        }
        Commands::Tasks {
            view,
            database_id,
            json,
        } => {
            let client = api_client(&cli, resolver)?;
            let params = ListTasksParams {
                view: view.clone(),
                database_id: database_id.clone(),
            };
            let tasks = client.list_tasks(&params).await?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("No tasks");
            } else {
                for detail in &tasks {
                    let task = &detail.task;
                    println!("{:<24} {:<12} {}", task.id, task.status, task.title);
                }
            }
            Ok(())
        }
        Commands::Comments { task_id } => {
            let client = api_client(&cli, resolver)?;
            let comments = client.list_comments(task_id).await?;
            if comments.is_empty() {
                println!("No comments");
            }
            for comment in &comments {
                println!("[{}] {}: {}", comment.created_at, comment.user_id, comment.content);
            }
            Ok(())
        }
        Commands::Comment {
            task_id,
            content,
            parent,
        } => {
            let client = api_client(&cli, resolver)?;
            let request = CreateCommentRequest {
                content: content.clone(),
                parent_id: parent.clone(),
            };
            let comment = client.create_comment(task_id, &request).await?;
            println!("Comment {} added", comment.id);
            Ok(())
        }
        Commands::Databases { search } => {
            let client = api_client(&cli, resolver)?;
            let databases = client.list_databases(search.as_deref()).await?;
            for db in &databases {
                println!(
                    "{:<36} {:<24} {}",
                    db.id,
                    db.name,
                    db.workspace.as_deref().unwrap_or("")
                );
            }
            Ok(())
        }
        Commands::Groups(group_command) => {
            let client = api_client(&cli, resolver)?;
            cmd_groups(&client, group_command).await
        }
    }
}

async fn cmd_groups(client: &ApiClient, command: &GroupCommands) -> Result<()> {
    match command {
        GroupCommands::List => {
            let groups = client.list_groups().await?;
            if groups.is_empty() {
                println!("No groups");
            }
            for group in &groups {
                let db = group.db.as_ref().map(|d| d.name.as_str()).unwrap_or("-");
                println!(
                    "{:<16} {:<24} {:?}/{:?} {}",
                    group.id, group.title, group.status, group.role, db
                );
            }
        }
        GroupCommands::Bind { group_id, db_id } => {
            let binding = client.bind_group(group_id, db_id).await?;
            info!(group = %binding.group_id, "Group bound");
            println!("{} is now {:?}", binding.group_id, binding.status);
        }
        GroupCommands::Unbind { group_id } => {
            let binding = client.unbind_group(group_id).await?;
            println!("{} is now {:?}", binding.group_id, binding.status);
        }
        GroupCommands::ValidateDb { group_id, db_id } => {
            let result = client.validate_group_database(group_id, db_id).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        GroupCommands::InitDb { group_id, db_id } => {
            let result = client.init_group_database(group_id, db_id).await?;
            if result.created_fields.is_empty() {
                println!("Nothing to create");
            } else {
                println!("Created: {}", result.created_fields.join(", "));
            }
        }
    }
    Ok(())
}

fn cmd_resolve(resolver: &InitDataResolver) -> Result<()> {
    match resolver.resolve_detailed() {
        Some(resolution) => {
            info!(source = resolution.source.as_str(), "Init data resolved");
            println!("{}", resolution.init_data.as_str());
        }
        None => eprintln!("No init data found. Open the app from Telegram or use set-mock."),
    }
    Ok(())
}

fn cmd_inspect(console: DebugConsole) -> Result<()> {
    let snapshot = console.inspect_init_data();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn cmd_set_mock(console: DebugConsole, value: &str) -> Result<()> {
    if !console.set_mock_init_data(value) {
        return Err("invalid mock init data, expected hash= and auth_date= fields".into());
    }
    println!("Mock init data stored");
    Ok(())
}

fn debug_console(resolver: &Arc<InitDataResolver>) -> DebugConsole {
    // A CLI run is a single page load; the console already reset the
    // resolver, so the next invocation simply starts fresh.
    DebugConsole::register(resolver.clone(), || {
        debug!("Reload requested");
    })
}

fn api_client(cli: &Cli, resolver: Arc<InitDataResolver>) -> Result<ApiClient> {
    let base_url = cli.api.clone().unwrap_or_else(config::api_base_url);
    Ok(ApiClient::new(&base_url, resolver)?)
}
