//! CLI for project-git.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use project_git::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "project-git")]
#[command(author, version, about = "Link project tasks to GitHub branches, commits and pull requests", long_about = None)]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage stored settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Manage projects and their repository link
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },

    /// Manage tasks and their branch, commits and pull requests
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Store the GitHub token (an empty value clears it)
    SetToken { token: String },

    /// Show the current settings
    Show,
}

#[derive(Subcommand)]
enum ProjectCommand {
    /// Add a project
    Add { name: String },

    /// List projects
    List,

    /// Show a project and its tasks
    Show { id: ProjectId },

    /// Create a GitHub repository for the project
    CreateRepo { id: ProjectId },

    /// Link the existing repository named after the project
    LinkRepo { id: ProjectId },
}

#[derive(Subcommand)]
enum TaskCommand {
    /// Add a task to a project
    Add { project: ProjectId, name: String },

    /// Show a task with its commits and pull requests
    Show { id: TaskId },

    /// Delete a task and its commit and pull request records
    Delete { id: TaskId },

    /// Create the task's branch off the default branch
    Branch {
        id: TaskId,

        /// Acting user (defaults to the configured user)
        #[arg(long)]
        user: Option<String>,
    },

    /// Fetch commits from the task's branch
    Commits { id: TaskId },

    /// Fetch pull requests opened from the task's branch
    Pulls { id: TaskId },

    /// Open a pull request for the task
    OpenPr {
        id: TaskId,

        /// Source branch (defaults to the task's branch)
        #[arg(long)]
        source: Option<String>,

        /// Target branch (defaults to the project's default branch)
        #[arg(long)]
        target: Option<String>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings_path = match cli.config {
        Some(path) => path,
        None => Settings::default_path()?,
    };
    let settings = Settings::load_from(&settings_path)
        .with_context(|| format!("Failed to load settings from {}", settings_path.display()))?;

    match cli.command {
        Commands::Config { command } => cmd_config(command, settings, &settings_path),
        Commands::Project { command } => cmd_project(command, &settings),
        Commands::Task { command } => cmd_task(command, &settings),
    }
}

fn integration(settings: &Settings) -> Result<GitIntegration<JsonFileStore>> {
    let path = settings.store_path()?;
    let store = JsonFileStore::open(&path)
        .with_context(|| format!("Failed to open records at {}", path.display()))?;
    let transport = HttpTransport::with_timeout(settings.request_timeout())?;
    Ok(GitIntegration::new(store, Arc::new(transport)).with_base_url(&settings.api_base_url))
}

fn cmd_config(command: ConfigCommand, settings: Settings, path: &Path) -> Result<()> {
    match command {
        ConfigCommand::SetToken { token } => {
            let settings = settings.set_token(token);
            settings
                .save_to(path)
                .with_context(|| format!("Failed to save settings to {}", path.display()))?;
            if settings.token().is_some() {
                println!("GitHub token saved to {}", path.display());
            } else {
                println!("GitHub token cleared");
            }
        }
        ConfigCommand::Show => {
            println!("settings file: {}", path.display());
            println!("api base url:  {}", settings.api_base_url);
            println!("timeout:       {}s", settings.timeout_secs);
            println!("store:         {}", settings.store_path()?.display());
            println!(
                "token:         {}",
                if settings.credentials().token().is_ok() {
                    "configured"
                } else {
                    "missing"
                }
            );
        }
    }
    Ok(())
}

fn cmd_project(command: ProjectCommand, settings: &Settings) -> Result<()> {
    let mut git = integration(settings)?;
    let credentials = settings.credentials();

    match command {
        ProjectCommand::Add { name } => {
            let project = git.store_mut().create_project(&name)?;
            println!("Added project {} ({})", project.id, project.name);
        }
        ProjectCommand::List => {
            for project in git.store().projects()? {
                println!(
                    "{:>4}  {:<30} {}",
                    project.id,
                    project.name,
                    project
                        .repository
                        .repository_url
                        .as_deref()
                        .unwrap_or("-")
                );
            }
        }
        ProjectCommand::Show { id } => {
            let project = git.store().project(id)?;
            let link = &project.repository;
            println!("{} ({})", project.name, link.connection_status);
            println!("  repository:     {}", link.repository_url.as_deref().unwrap_or("-"));
            println!("  default branch: {}", project.default_branch());
            for task in git.store().tasks(id)? {
                println!(
                    "  task {:>4}  {:<30} {}",
                    task.id,
                    task.name,
                    task.dev_branch().unwrap_or("-")
                );
            }
        }
        ProjectCommand::CreateRepo { id } => {
            let linked = git
                .create_repository(&credentials, id)
                .context("Repository creation failed")?;
            println!("{} {}", linked, linked.repository_url);
        }
        ProjectCommand::LinkRepo { id } => {
            let linked = git
                .assign_existing_repository(&credentials, id)
                .context("Repository link failed")?;
            println!("{} {}", linked, linked.repository_url);
        }
    }
    Ok(())
}

fn cmd_task(command: TaskCommand, settings: &Settings) -> Result<()> {
    let mut git = integration(settings)?;
    let credentials = settings.credentials();

    match command {
        TaskCommand::Add { project, name } => {
            let task = git.store_mut().create_task(project, &name)?;
            println!("Added task {} ({})", task.id, task.name);
        }
        TaskCommand::Show { id } => show_task(git.store(), id)?,
        TaskCommand::Delete { id } => {
            git.store_mut().delete_task(id)?;
            println!("Deleted task {}", id);
        }
        TaskCommand::Branch { id, user } => {
            let login = user
                .or_else(|| settings.user.clone())
                .or_else(|| std::env::var("USER").ok())
                .context("No acting user: pass --user or set `user` in the settings")?;
            let created = git
                .create_branch(&credentials, id, &UserRef::new(login))
                .context("Branch creation failed")?;
            println!("{}", created);
            if let Some(url) = created.url {
                println!("{}", url);
            }
        }
        TaskCommand::Commits { id } => {
            let fetched = git
                .fetch_commits(&credentials, id)
                .context("Commit fetch failed")?;
            println!("{}", fetched);
        }
        TaskCommand::Pulls { id } => {
            let fetched = git
                .fetch_pull_requests(&credentials, id)
                .context("Pull request fetch failed")?;
            println!("{}", fetched);
        }
        TaskCommand::OpenPr {
            id,
            source,
            target,
            title,
            description,
        } => {
            let task = git.store().task(id)?;
            let project = git.store().project(task.project_id)?;
            let mut draft = PullRequestDraft::for_task(&project, &task);
            if let Some(source) = source {
                draft.source_branch = source;
            }
            if let Some(target) = target {
                draft.target_branch = target;
            }
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(description) = description {
                draft.description = description;
            }

            let opened = git
                .create_pull_request(&credentials, id, &draft)
                .context("Pull request creation failed")?;
            println!("{} {}", opened, opened.url);
        }
    }
    Ok(())
}

fn show_task(store: &impl RecordStore, id: TaskId) -> Result<()> {
    let task = store.task(id)?;
    let link = &task.branch;
    println!("{} ({})", task.name, link.branch_status);
    println!("  branch:      {}", task.dev_branch().unwrap_or("-"));
    println!("  url:         {}", link.dev_branch_url.as_deref().unwrap_or("-"));
    if let Some(synced) = link.last_synced_on {
        println!("  last synced: {}", synced);
    }

    let commits = store.commits(id)?;
    println!("  commits ({}):", commits.len());
    for commit in commits {
        let short: String = commit.hash.chars().take(7).collect();
        let summary = commit.message.lines().next().unwrap_or_default();
        println!(
            "    {} {} ({})",
            short,
            summary,
            commit.author_name.as_deref().unwrap_or("unknown")
        );
    }

    let pulls = store.pull_requests(id)?;
    println!("  pull requests ({}):", pulls.len());
    for pr in pulls {
        println!(
            "    #{} [{}] {} {} -> {}",
            pr.number, pr.status, pr.title, pr.source_branch, pr.target_branch
        );
    }
    Ok(())
}
